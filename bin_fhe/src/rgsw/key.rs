use std::sync::Arc;

use math::poly::Format;
use math::ring::Ring;

use crate::lwe::keys::LWESwitchingKey;
use crate::params::{BinFHEMethod, RingGSWParams};
use crate::rgsw::ciphertext::RingGSWCiphertext;

/// Grid of RingGSW ciphertexts indexed `[i][j][k]`.
pub type KeyGrid = Vec<Vec<Vec<RingGSWCiphertext>>>;

/// Bootstrapping key, tagged with the accumulator it feeds.
///
/// * AP: `[n][baseR][digitsR]`, entry (i, j, k) encrypts X^(s_i * j * baseR^k);
///   the j = 0 slots are empty.
/// * GINX: `[1][2][n]`, entries (0, 0, i) and (0, 1, i) encrypt [s_i = 1]
///   and [s_i = -1].
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrappingKey {
    AP(KeyGrid),
    GINX(KeyGrid),
}

impl BootstrappingKey {
    /// Zero key with the layout of params, to be filled by deserialization.
    pub fn alloc(params: &RingGSWParams) -> Self {
        let ring: &Arc<Ring<u64>> = params.ring();
        let zero = || RingGSWCiphertext::zero(ring, params.digits_g2(), Format::Evaluation);
        let n: usize = params.lwe().n;
        match params.method() {
            BinFHEMethod::AP => {
                let digits_r: usize = params.digits_r().len();
                let grid: KeyGrid = (0..n)
                    .map(|_| {
                        (0..params.base_r())
                            .map(|j| {
                                if j == 0 {
                                    Vec::new()
                                } else {
                                    (0..digits_r)
                                        .map(|_| zero())
                                        .collect::<Vec<RingGSWCiphertext>>()
                                }
                            })
                            .collect::<Vec<Vec<RingGSWCiphertext>>>()
                    })
                    .collect();
                BootstrappingKey::AP(grid)
            }
            BinFHEMethod::GINX => {
                let row: Vec<Vec<RingGSWCiphertext>> = (0..2)
                    .map(|_| (0..n).map(|_| zero()).collect::<Vec<RingGSWCiphertext>>())
                    .collect();
                BootstrappingKey::GINX(vec![row])
            }
        }
    }

    pub fn method(&self) -> BinFHEMethod {
        match self {
            BootstrappingKey::AP(_) => BinFHEMethod::AP,
            BootstrappingKey::GINX(_) => BinFHEMethod::GINX,
        }
    }

    pub fn grid(&self) -> &KeyGrid {
        match self {
            BootstrappingKey::AP(grid) | BootstrappingKey::GINX(grid) => grid,
        }
    }

    pub(crate) fn grid_mut(&mut self) -> &mut KeyGrid {
        match self {
            BootstrappingKey::AP(grid) | BootstrappingKey::GINX(grid) => grid,
        }
    }

    #[inline(always)]
    pub fn at(&self, i: usize, j: usize, k: usize) -> &RingGSWCiphertext {
        &self.grid()[i][j][k]
    }

    /// Number of ciphertexts in the key.
    pub fn len(&self) -> usize {
        self.grid()
            .iter()
            .flat_map(|x| x.iter())
            .map(|x| x.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything gate evaluation needs: the bootstrapping key and the
/// key-switching key back to the LWE secret. Shared read-only.
#[derive(Clone, Debug)]
pub struct RingGSWEvalKey {
    bs_key: Arc<BootstrappingKey>,
    ks_key: Arc<LWESwitchingKey>,
}

impl RingGSWEvalKey {
    pub fn new(bs_key: BootstrappingKey, ks_key: LWESwitchingKey) -> Self {
        Self {
            bs_key: Arc::new(bs_key),
            ks_key: Arc::new(ks_key),
        }
    }

    pub fn bs_key(&self) -> &BootstrappingKey {
        &self.bs_key
    }

    pub fn ks_key(&self) -> &LWESwitchingKey {
        &self.ks_key
    }
}

use crate::error::MathError;
use crate::modulus::WordOps;
use utils::map::Map;

/// Cache of automorphism lookup tables keyed by galois element.
#[derive(Clone, Debug, Default)]
pub struct AutoPermMap(Map<usize, AutoPerm>);

impl AutoPermMap {
    pub fn new() -> Self {
        Self(Map::<usize, AutoPerm>::new())
    }

    pub fn insert(&mut self, perm: AutoPerm) {
        self.0.insert(perm.gal_el, perm);
    }

    /// Builds and caches the tables of gal_el for ring degree n.
    pub fn prepare(&mut self, n: usize, gal_el: usize) -> Result<(), MathError> {
        if !self.0.contains(&gal_el) {
            self.insert(AutoPerm::new(n, gal_el)?)
        }
        Ok(())
    }

    pub fn get(&self, gal_el: &usize) -> Option<&AutoPerm> {
        self.0.get(gal_el)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lookup tables for the automorphism X^i -> X^(i * gal_el mod 2n).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoPerm {
    pub gal_el: usize,
    /// Evaluation domain: output j reads input ntt[j].
    pub ntt: Vec<usize>,
    /// Coefficient domain: input i lands at coeff[i] & (n-1), negated
    /// if the top bit of coeff[i] is set.
    pub coeff: Vec<usize>,
}

impl AutoPerm {
    /// Fails if n is not a power of two or if gal_el is not
    /// an odd value in [1, 2n).
    pub fn new(n: usize, gal_el: usize) -> Result<Self, MathError> {
        if n == 0 || n & (n - 1) != 0 {
            return Err(MathError::InvalidRingDimension(n));
        }

        let cyclotomic_order: usize = n << 1;

        if gal_el & 1 == 0 || gal_el >= cyclotomic_order {
            return Err(MathError::InvalidGaloisElement {
                gal_el,
                nth_root: cyclotomic_order,
            });
        }

        let mask: usize = cyclotomic_order - 1;
        let log_n: u32 = n.log2() as u32;

        let ntt: Vec<usize> = (0..n)
            .map(|j| {
                let j_rev: usize = 2 * j.reverse_bits_msb(log_n) + 1;
                let gal_el_j: usize = ((gal_el * j_rev) & mask) >> 1;
                gal_el_j.reverse_bits_msb(log_n)
            })
            .collect();

        let coeff: Vec<usize> = (0..n)
            .map(|i| {
                let gal_el_i: usize = i * gal_el;
                let sign: usize = (gal_el_i >> log_n) & 1;
                (gal_el_i & (n - 1)) | (sign << (usize::BITS - 1))
            })
            .collect();

        Ok(Self { gal_el, ntt, coeff })
    }
}

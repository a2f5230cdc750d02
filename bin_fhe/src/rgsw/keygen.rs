use std::sync::Arc;

use math::poly::{Format, NativePoly};
use math::ring::Ring;
use rayon::prelude::*;
use sampling::source::Source;
use tracing::{debug, instrument};

use crate::error::{BinFHEError, Result};
use crate::lwe::keys::{LWESecretKey, LWESwitchingKey};
use crate::lwe::scheme::LWEScheme;
use crate::params::{BinFHEMethod, RingGSWParams};
use crate::rgsw::ciphertext::RingGSWCiphertext;
use crate::rgsw::encryption::{encrypt_ap, encrypt_ginx};
use crate::rgsw::key::{BootstrappingKey, KeyGrid, RingGSWEvalKey};

/// Samples the ring secret, then generates the key-switching key from it
/// back to `sk` and the bootstrapping key of the configured method.
#[instrument(level = "debug", skip_all, fields(method = ?params.method(), n = sk.n()))]
pub fn key_gen(
    params: &RingGSWParams,
    lwe: &LWEScheme,
    sk: &LWESecretKey,
    source: &mut Source,
) -> Result<RingGSWEvalKey> {
    let ring: &Arc<Ring<u64>> = params.ring();
    let sk_n: LWESecretKey = lwe.key_gen_n(source);
    let ks_key: LWESwitchingKey = lwe.key_switch_gen(sk, &sk_n, source);

    let mut sk_ntt: NativePoly = NativePoly::from_values(ring, sk_n.values(), Format::Coefficient)?;
    sk_ntt.set_format(Format::Evaluation);

    let bs_key: BootstrappingKey = match params.method() {
        BinFHEMethod::AP => key_gen_ap(params, &sk_ntt, sk, source)?,
        BinFHEMethod::GINX => key_gen_ginx(params, &sk_ntt, sk, source)?,
    };
    debug!(
        method = ?bs_key.method(),
        ciphertexts = bs_key.len(),
        rows = params.digits_g2(),
        "bootstrapping key generated"
    );
    Ok(RingGSWEvalKey::new(bs_key, ks_key))
}

/// Entry (i, j, k) encrypts X^(s_i * j * baseR^k) for j in [1, baseR).
pub fn key_gen_ap(
    params: &RingGSWParams,
    sk_ntt: &NativePoly,
    sk: &LWESecretKey,
    source: &mut Source,
) -> Result<BootstrappingKey> {
    let secret: Vec<i64> = sk.signed_values().collect();
    let sources: Vec<Source> = source.branches(secret.len());

    let grid: KeyGrid = secret
        .into_par_iter()
        .zip(sources.into_par_iter())
        .map(|(s, mut source)| {
            (0..params.base_r() as i64)
                .map(|j| {
                    if j == 0 {
                        return Ok(Vec::new());
                    }
                    params
                        .digits_r()
                        .iter()
                        .map(|&power| encrypt_ap(params, sk_ntt, s * j * power as i64, &mut source))
                        .collect::<Result<Vec<RingGSWCiphertext>>>()
                })
                .collect::<Result<Vec<Vec<RingGSWCiphertext>>>>()
        })
        .collect::<Result<KeyGrid>>()?;

    Ok(BootstrappingKey::AP(grid))
}

/// Entries (0, 0, i) and (0, 1, i) encrypt the indicator bits [s_i = 1] and
/// [s_i = -1]. Fails on secrets outside {-1, 0, 1}.
pub fn key_gen_ginx(
    params: &RingGSWParams,
    sk_ntt: &NativePoly,
    sk: &LWESecretKey,
    source: &mut Source,
) -> Result<BootstrappingKey> {
    let secret: Vec<i64> = sk.signed_values().collect();
    if let Some((i, s)) = secret.iter().enumerate().find(|(_, s)| s.abs() > 1) {
        return Err(BinFHEError::Config(format!(
            "GINX requires a ternary secret, found {s} at index {i}"
        )));
    }
    let sources: Vec<Source> = source.branches(secret.len());

    let pairs: Vec<(RingGSWCiphertext, RingGSWCiphertext)> = secret
        .into_par_iter()
        .zip(sources.into_par_iter())
        .map(|(s, mut source)| -> Result<(RingGSWCiphertext, RingGSWCiphertext)> {
            let plus: RingGSWCiphertext =
                encrypt_ginx(params, sk_ntt, (s == 1) as u64, &mut source)?;
            let minus: RingGSWCiphertext =
                encrypt_ginx(params, sk_ntt, (s == -1) as u64, &mut source)?;
            Ok((plus, minus))
        })
        .collect::<Result<Vec<(RingGSWCiphertext, RingGSWCiphertext)>>>()?;

    let (plus, minus): (Vec<RingGSWCiphertext>, Vec<RingGSWCiphertext>) = pairs.into_iter().unzip();
    Ok(BootstrappingKey::GINX(vec![vec![plus, minus]]))
}

use std::sync::Arc;

use itertools::izip;
use math::modulus::native::NativeInt;
use math::modulus::WordOps;
use rayon::prelude::*;
use sampling::distributions::Distribution;
use sampling::source::Source;
use tracing::{debug, instrument};

use crate::lwe::ciphertext::{LWECiphertext, LWEPlaintext};
use crate::lwe::keys::{LWESecretKey, LWESwitchingKey};
use crate::params::LWEParams;

/// Plaintext space Z_4 of a bit encryption.
const PLAINTEXT_MODULUS: u64 = 4;

/// <a, s> mod modulus.
#[inline(always)]
pub(crate) fn dot_product(a: &[u64], s: &[u64], modulus: NativeInt, mu: u128) -> NativeInt {
    debug_assert!(a.len() == s.len(), "{} != {}", a.len(), s.len());
    izip!(a.iter(), s.iter()).fold(NativeInt(0), |acc, (&a, &s)| {
        acc.mod_add_fast(NativeInt(a).mod_mul_fast(NativeInt(s), modulus, mu), modulus)
    })
}

fn sample_uniform(source: &mut Source, modulus: u64, n: usize) -> Vec<u64> {
    let mask: u64 = modulus.mask();
    (0..n).map(|_| source.next_u64n(modulus, mask)).collect()
}

/// LWE encryption over the parameters' moduli: gates take and return
/// ciphertexts modulo q of dimension n, bootstrapping extracts ciphertexts
/// modulo Q of dimension N.
#[derive(Clone, Debug)]
pub struct LWEScheme {
    params: Arc<LWEParams>,
    secret: Distribution,
    error: Distribution,
}

impl LWEScheme {
    /// Ternary secrets, Gaussian errors of the parameters' sigma.
    pub fn new(params: Arc<LWEParams>) -> Self {
        let error: Distribution = Distribution::Gaussian(*params.dgg());
        Self {
            params,
            secret: Distribution::Ternary,
            error,
        }
    }

    pub fn params(&self) -> &Arc<LWEParams> {
        &self.params
    }

    fn ternary(&self, source: &mut Source, n: usize, modulus: u64) -> LWESecretKey {
        let values: Vec<u64> = (0..n)
            .map(|_| self.secret.sample_mod(source, modulus))
            .collect();
        LWESecretKey::new(values, modulus)
    }

    /// Ternary secret of dimension n modulo q.
    pub fn key_gen(&self, source: &mut Source) -> LWESecretKey {
        self.ternary(source, self.params.n, self.params.q)
    }

    /// Ternary secret of dimension N modulo Q.
    pub fn key_gen_n(&self, source: &mut Source) -> LWESecretKey {
        self.ternary(source, self.params.big_n, self.params.big_q)
    }

    /// Encrypts m mod 4 under sk, at the modulus of sk.
    pub fn encrypt(
        &self,
        sk: &LWESecretKey,
        m: LWEPlaintext,
        source: &mut Source,
    ) -> LWECiphertext {
        let modulus: u64 = sk.modulus();
        let q: NativeInt = NativeInt(modulus);
        let mu: u128 = self.params.mu(modulus);

        let a: Vec<u64> = sample_uniform(source, modulus, sk.n());
        let e: NativeInt = NativeInt(self.error.sample_mod(source, modulus));
        let mut b: NativeInt = NativeInt((m % PLAINTEXT_MODULUS) * (modulus / PLAINTEXT_MODULUS));
        b = b.mod_add_fast(e, q);
        b = b.mod_add_fast(dot_product(&a, sk.values(), q, mu), q);
        LWECiphertext::new(a, b.value(), modulus)
    }

    /// Returns floor(4 * (r + q/8) / q) mod 4 with r = b - <a, s>.
    pub fn decrypt(&self, sk: &LWESecretKey, ct: &LWECiphertext) -> LWEPlaintext {
        debug_assert!(sk.modulus() == ct.modulus());
        let modulus: u64 = ct.modulus();
        let q: NativeInt = NativeInt(modulus);
        let mu: u128 = self.params.mu(modulus);

        let mut r: NativeInt =
            NativeInt(ct.b()).mod_sub_fast(dot_product(ct.a(), sk.values(), q, mu), q);
        r = r.mod_add_fast(NativeInt(modulus / (2 * PLAINTEXT_MODULUS)), q);
        let scaled: u128 = r.value() as u128 * PLAINTEXT_MODULUS as u128 / modulus as u128;
        (scaled as u64) % PLAINTEXT_MODULUS
    }

    /// Generates encryptions under sk (moved to Q) of sk_n[i] * j * baseKS^k
    /// for every coordinate i < N, digit value j < baseKS and position k.
    #[instrument(level = "debug", skip_all, fields(n = sk.n(), big_n = sk_n.n()))]
    pub fn key_switch_gen(
        &self,
        sk: &LWESecretKey,
        sk_n: &LWESecretKey,
        source: &mut Source,
    ) -> LWESwitchingKey {
        let params: &LWEParams = &self.params;
        let big_q: u64 = params.big_q;
        let q: NativeInt = NativeInt(big_q);
        let mu: u128 = params.mu(big_q);
        let sk_q: LWESecretKey = sk.switch_modulus(big_q);
        debug_assert!(sk_n.modulus() == big_q);

        let sources: Vec<Source> = source.branches(sk_n.n());
        let keys: Vec<Vec<Vec<LWECiphertext>>> = sources
            .into_par_iter()
            .zip(sk_n.values().par_iter())
            .map(|(mut source, &s_i)| {
                (0..params.base_ks)
                    .map(|j| {
                        let s_ij: NativeInt = NativeInt(s_i).mod_mul(NativeInt(j), q);
                        params
                            .digits_ks()
                            .iter()
                            .map(|&power| {
                                let a: Vec<u64> = sample_uniform(&mut source, big_q, sk_q.n());
                                let mut b: NativeInt =
                                    NativeInt(self.error.sample_mod(&mut source, big_q));
                                b = b.mod_add_fast(s_ij.mod_mul_fast(NativeInt(power), q, mu), q);
                                b = b.mod_add_fast(dot_product(&a, sk_q.values(), q, mu), q);
                                LWECiphertext::new(a, b.value(), big_q)
                            })
                            .collect::<Vec<LWECiphertext>>()
                    })
                    .collect::<Vec<Vec<LWECiphertext>>>()
            })
            .collect();

        let ksk: LWESwitchingKey = LWESwitchingKey::new(keys);
        debug!(dims = ?ksk.dims(), "key-switching key generated");
        ksk
    }

    /// Switches a dimension-N ciphertext modulo Q to dimension n modulo Q.
    pub fn key_switch(&self, ksk: &LWESwitchingKey, ct: &LWECiphertext) -> LWECiphertext {
        let params: &LWEParams = &self.params;
        let q: NativeInt = NativeInt(params.big_q);
        debug_assert!(ct.modulus() == params.big_q);
        debug_assert!(ct.n() == params.big_n, "{} != {}", ct.n(), params.big_n);

        let mut out: LWECiphertext = LWECiphertext::zero(params.n, params.big_q);
        let mut b: NativeInt = NativeInt(ct.b());
        for (i, &a_i) in ct.a().iter().enumerate() {
            let mut digits: u64 = a_i;
            for k in 0..params.digits_ks().len() {
                let value: usize = (digits % params.base_ks) as usize;
                digits /= params.base_ks;
                let key: &LWECiphertext = ksk.at(i, value, k);
                izip!(out.a_mut().iter_mut(), key.a().iter())
                    .for_each(|(x, &y)| *x = NativeInt(*x).mod_sub_fast(NativeInt(y), q).value());
                b = b.mod_sub_fast(NativeInt(key.b()), q);
            }
        }
        out.set_b(b.value());
        out
    }

    /// Rescales every coefficient to round(v * q / Q) mod q.
    pub fn mod_switch(&self, q: u64, ct: &LWECiphertext) -> LWECiphertext {
        let big_q: u128 = ct.modulus() as u128;
        let round = |v: u64| -> u64 {
            (((v as u128 * q as u128 + (big_q >> 1)) / big_q) % q as u128) as u64
        };
        LWECiphertext::new(ct.a().iter().map(|&v| round(v)).collect(), round(ct.b()), q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::BinFHEParamSet;

    fn scheme() -> LWEScheme {
        LWEScheme::new(Arc::new(BinFHEParamSet::Toy.lwe_params().unwrap()))
    }

    #[test]
    fn encrypt_decrypt() {
        let scheme: LWEScheme = scheme();
        let mut source: Source = Source::new([3u8; 32]);
        let sk: LWESecretKey = scheme.key_gen(&mut source);
        assert_eq!(sk.n(), 64);
        for m in 0..4 {
            for _ in 0..16 {
                let ct: LWECiphertext = scheme.encrypt(&sk, m, &mut source);
                assert_eq!(ct.modulus(), 256);
                assert_eq!(scheme.decrypt(&sk, &ct), m);
            }
        }
    }

    #[test]
    fn key_gen_is_ternary() {
        let scheme: LWEScheme = scheme();
        let mut source: Source = Source::new([5u8; 32]);
        let q: u64 = scheme.params().q;
        let sk: LWESecretKey = scheme.key_gen(&mut source);
        assert!(sk.values().iter().all(|&s| s == 0 || s == 1 || s == q - 1));
        for s in [0, 1, q - 1] {
            assert!(sk.values().contains(&s), "{s} never drawn");
        }
        let big_q: u64 = scheme.params().big_q;
        let sk_n: LWESecretKey = scheme.key_gen_n(&mut source);
        assert_eq!(sk_n.modulus(), big_q);
        assert!(sk_n.values().iter().all(|&s| s == 0 || s == 1 || s == big_q - 1));
    }

    #[test]
    fn mod_switch_rounds() {
        let scheme: LWEScheme = scheme();
        let big_q: u64 = scheme.params().big_q;
        let ct: LWECiphertext =
            LWECiphertext::new(vec![0, big_q / 2, big_q - 1, big_q / 256 + 1], big_q / 4, big_q);
        let switched: LWECiphertext = scheme.mod_switch(256, &ct);
        assert_eq!(switched.a(), &[0, 128, 0, 1]);
        assert_eq!(switched.b(), 64);
        assert_eq!(switched.modulus(), 256);
    }

    #[test]
    fn key_switch_preserves_plaintext() {
        let scheme: LWEScheme = scheme();
        let params: Arc<LWEParams> = scheme.params().clone();
        let mut source: Source = Source::new([4u8; 32]);
        let sk: LWESecretKey = scheme.key_gen(&mut source);
        let sk_n: LWESecretKey = scheme.key_gen_n(&mut source);
        let ksk: LWESwitchingKey = scheme.key_switch_gen(&sk, &sk_n, &mut source);
        assert_eq!(ksk.dims(), (params.big_n, params.base_ks as usize, params.digits_ks().len()));

        let sk_q: LWESecretKey = sk.switch_modulus(params.big_q);
        for m in 0..4 {
            let ct: LWECiphertext = scheme.encrypt(&sk_n, m, &mut source);
            let switched: LWECiphertext = scheme.key_switch(&ksk, &ct);
            assert_eq!(switched.n(), params.n);
            assert_eq!(scheme.decrypt(&sk_q, &switched), m);
            let small: LWECiphertext = scheme.mod_switch(params.q, &switched);
            assert_eq!(scheme.decrypt(&sk, &small), m);
        }
    }
}

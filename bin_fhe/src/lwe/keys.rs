use math::modulus::native::NativeInt;

use crate::lwe::ciphertext::LWECiphertext;

/// Ternary LWE secret, values stored modulo `modulus` (-1 as modulus - 1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LWESecretKey {
    values: Vec<u64>,
    modulus: u64,
}

impl LWESecretKey {
    pub fn new(values: Vec<u64>, modulus: u64) -> Self {
        debug_assert!(values.iter().all(|&x| x < modulus));
        Self { values, modulus }
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn n(&self) -> usize {
        self.values.len()
    }

    /// Centered representatives in (-modulus/2, modulus/2].
    pub fn signed_values(&self) -> impl Iterator<Item = i64> + '_ {
        let q: NativeInt = NativeInt(self.modulus);
        self.values.iter().map(move |&x| NativeInt(x).to_signed_centered(q))
    }

    /// Same small secret, represented modulo `modulus`.
    pub fn switch_modulus(&self, modulus: u64) -> LWESecretKey {
        let values: Vec<u64> = self
            .signed_values()
            .map(|x| {
                if x < 0 {
                    modulus - (x.unsigned_abs() % modulus)
                } else {
                    x as u64 % modulus
                }
            })
            .collect();
        LWESecretKey::new(values, modulus)
    }
}

/// Key-switching key from the ring secret (dimension N) to the LWE secret
/// (dimension n), indexed `[i][digit value][digit position]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LWESwitchingKey {
    keys: Vec<Vec<Vec<LWECiphertext>>>,
}

impl LWESwitchingKey {
    pub fn new(keys: Vec<Vec<Vec<LWECiphertext>>>) -> Self {
        Self { keys }
    }

    #[inline(always)]
    pub fn at(&self, i: usize, value: usize, digit: usize) -> &LWECiphertext {
        &self.keys[i][value][digit]
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        let base: usize = self.keys.first().map_or(0, |k| k.len());
        let digits: usize = self
            .keys
            .first()
            .and_then(|k| k.first())
            .map_or(0, |k| k.len());
        (self.keys.len(), base, digits)
    }
}

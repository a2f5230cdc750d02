use itertools::izip;
use math::modulus::native::NativeInt;

/// Plaintext in Z_4; bits are encoded as 0 and 1.
pub type LWEPlaintext = u64;

/// LWE ciphertext (a, b) with b - <a, s> = m * modulus/4 + e.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LWECiphertext {
    a: Vec<u64>,
    b: u64,
    modulus: u64,
}

impl LWECiphertext {
    pub fn new(a: Vec<u64>, b: u64, modulus: u64) -> Self {
        debug_assert!(
            a.iter().all(|&x| x < modulus) && b < modulus,
            "coefficients must be reduced modulo {modulus}"
        );
        Self { a, b, modulus }
    }

    pub fn zero(n: usize, modulus: u64) -> Self {
        Self {
            a: vec![0u64; n],
            b: 0,
            modulus,
        }
    }

    pub fn a(&self) -> &[u64] {
        &self.a
    }

    pub fn b(&self) -> u64 {
        self.b
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn n(&self) -> usize {
        self.a.len()
    }

    pub(crate) fn a_mut(&mut self) -> &mut [u64] {
        &mut self.a
    }

    pub(crate) fn set_b(&mut self, b: u64) {
        self.b = b
    }

    fn check_compatible(&self, other: &LWECiphertext) {
        debug_assert!(
            self.modulus == other.modulus,
            "modulus mismatch: {} != {}",
            self.modulus,
            other.modulus
        );
        debug_assert!(
            self.n() == other.n(),
            "dimension mismatch: {} != {}",
            self.n(),
            other.n()
        );
    }

    pub fn add(&self, other: &LWECiphertext) -> LWECiphertext {
        self.check_compatible(other);
        let q: NativeInt = NativeInt(self.modulus);
        let a: Vec<u64> = izip!(self.a.iter(), other.a.iter())
            .map(|(&x, &y)| NativeInt(x).mod_add_fast(NativeInt(y), q).value())
            .collect();
        let b: u64 = NativeInt(self.b).mod_add_fast(NativeInt(other.b), q).value();
        LWECiphertext::new(a, b, self.modulus)
    }

    pub fn sub(&self, other: &LWECiphertext) -> LWECiphertext {
        self.check_compatible(other);
        let q: NativeInt = NativeInt(self.modulus);
        let a: Vec<u64> = izip!(self.a.iter(), other.a.iter())
            .map(|(&x, &y)| NativeInt(x).mod_sub_fast(NativeInt(y), q).value())
            .collect();
        let b: u64 = NativeInt(self.b).mod_sub_fast(NativeInt(other.b), q).value();
        LWECiphertext::new(a, b, self.modulus)
    }

    /// Returns 2 * self.
    pub fn double(&self) -> LWECiphertext {
        self.add(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_wraps_modulo_q() {
        let x: LWECiphertext = LWECiphertext::new(vec![250, 3, 0], 255, 256);
        let y: LWECiphertext = LWECiphertext::new(vec![10, 5, 1], 1, 256);
        assert_eq!(x.add(&y), LWECiphertext::new(vec![4, 8, 1], 0, 256));
        assert_eq!(y.sub(&x), LWECiphertext::new(vec![16, 2, 1], 2, 256));
        assert_eq!(x.double(), LWECiphertext::new(vec![244, 6, 0], 254, 256));
    }
}

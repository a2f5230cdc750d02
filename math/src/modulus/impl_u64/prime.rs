use crate::error::MathError;
use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::prime::Prime;
use crate::modulus::shoup::ShoupPrecomp;
use crate::modulus::ONCE;
use primality_test::is_prime;
use prime_factorization::Factorization;

/// Largest bit-length accepted for a [Prime] modulus, so that the lazy NTT
/// butterflies stay below 4q < 2^64 with headroom.
pub const PRIME_MAX_BITS: u32 = 61;

impl Prime<u64> {
    /// Returns a new instance of Prime<u64>.
    /// Fails if q is not a prime > 2 or exceeds [PRIME_MAX_BITS] bits.
    pub fn new(q: u64) -> Result<Self, MathError> {
        if q <= 2 || !is_prime(q) {
            return Err(MathError::InvalidModulus {
                modulus: q,
                reason: "not an odd prime",
            });
        }
        Self::new_unchecked(q)
    }

    /// Returns a new instance of Prime<u64>.
    /// Does not check if q is a prime > 2.
    pub fn new_unchecked(q: u64) -> Result<Self, MathError> {
        if u64::BITS - q.leading_zeros() > PRIME_MAX_BITS {
            return Err(MathError::InvalidModulus {
                modulus: q,
                reason: "exceeds 61 bits",
            });
        }

        let factors: Vec<u64> = Factorization::run(q - 1)
            .prime_factor_repr()
            .iter()
            .map(|factor| factor.0)
            .collect();

        Ok(Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            phi: q - 1,
            factors,
            barrett: BarrettPrecomp::new(q)?,
            shoup: ShoupPrecomp::new(q),
        })
    }

    #[inline(always)]
    pub fn q(&self) -> u64 {
        self.q
    }

    /// Returns x^exponent mod q.
    #[inline(always)]
    pub fn pow(&self, x: u64, exponent: u64) -> u64 {
        let mut y: u64 = 1;
        let mut x: u64 = x % self.q;
        let mut i: u64 = exponent;
        while i > 0 {
            if i & 1 == 1 {
                y = self.barrett.mul_external::<ONCE>(x, y);
            }
            x = self.barrett.mul_external::<ONCE>(x, x);
            i >>= 1;
        }
        y
    }

    /// Returns x^-1 mod q.
    #[inline(always)]
    pub fn inv(&self, x: u64) -> Result<u64, MathError> {
        if x % self.q == 0 {
            return Err(MathError::NotInvertible {
                value: x,
                modulus: self.q,
            });
        }
        Ok(self.pow(x, self.phi - 1))
    }

    /// Returns the smallest generator of the multiplicative group mod q.
    pub fn primitive_root(&self) -> u64 {
        let mut candidate: u64 = 1;
        loop {
            candidate += 1;
            if self
                .factors
                .iter()
                .all(|&factor| self.pow(candidate, self.phi / factor) != 1)
            {
                return candidate;
            }
        }
    }

    /// Returns a primitive nth_root of unity mod q.
    pub fn primitive_nth_root(&self, nth_root: u64) -> Result<u64, MathError> {
        if nth_root < 2 || self.phi % nth_root != 0 {
            return Err(MathError::InvalidModulus {
                modulus: self.q,
                reason: "q != 1 mod nth_root",
            });
        }

        let psi: u64 = self.pow(self.primitive_root(), self.phi / nth_root);

        debug_assert!(
            self.pow(psi, nth_root) == 1,
            "invalid nth primitive root: psi^nth_root != 1 mod q"
        );
        debug_assert!(
            nth_root & 1 == 1 || self.pow(psi, nth_root >> 1) == self.q - 1,
            "invalid nth primitive root: psi^(nth_root/2) != -1 mod q"
        );

        Ok(psi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_composites_and_large_moduli() {
        assert!(Prime::<u64>::new(15).is_err());
        assert!(Prime::<u64>::new(2).is_err());
        assert!(Prime::<u64>::new_unchecked(1 << 62).is_err());
    }

    #[test]
    fn primitive_nth_root() {
        let prime: Prime<u64> = Prime::<u64>::new(12289).unwrap();
        assert_eq!(prime.primitive_root(), 11);
        let psi: u64 = prime.primitive_nth_root(2048).unwrap();
        assert_eq!(prime.pow(psi, 2048), 1);
        assert_eq!(prime.pow(psi, 1024), prime.q() - 1);
        assert!(prime.primitive_nth_root(1 << 13).is_err());
    }

    #[test]
    fn inverse() {
        let prime: Prime<u64> = Prime::<u64>::new(0x1fffffffffe00001).unwrap();
        let x: u64 = 0x123456789;
        assert_eq!(
            prime.barrett.mul_external::<ONCE>(x, prime.inv(x).unwrap()),
            1
        );
        assert!(prime.inv(0).is_err());
    }
}

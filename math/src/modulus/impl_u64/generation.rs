use crate::error::MathError;
use crate::modulus::prime::Prime;
use primality_test::is_prime;

/// Enumerates primes q = 1 mod nth_root upward from 2^bit_size + 1.
pub struct NTTFriendlyPrimesGenerator {
    size: f64,
    next_prime: u64,
    nth_root: u64,
    exhausted: bool,
}

impl NTTFriendlyPrimesGenerator {
    pub fn new(bit_size: u64, nth_root: u64) -> Self {
        let next_prime: u64 = (1 << bit_size) + 1;
        Self {
            size: bit_size as f64,
            next_prime,
            nth_root,
            exhausted: next_prime > nth_root.wrapping_neg(),
        }
    }

    pub fn next_upstream_prime(&mut self) -> Result<Prime<u64>, MathError> {
        loop {
            if self.exhausted || self.upstream_exhausted() {
                self.exhausted = true;
                return Err(MathError::InvalidModulus {
                    modulus: self.next_prime,
                    reason: "upstream prime list exhausted",
                });
            }
            let candidate: u64 = self.next_prime;
            self.next_prime += self.nth_root;
            if is_prime(candidate) {
                return Prime::new_unchecked(candidate);
            }
        }
    }

    fn upstream_exhausted(&self) -> bool {
        (self.next_prime as f64).log2() - self.size >= 0.5
            || self.next_prime > u64::MAX - self.nth_root
    }
}

/// Returns the smallest prime q > 2^bit_size with q = 1 mod nth_root.
pub fn first_prime(bit_size: u64, nth_root: u64) -> Result<Prime<u64>, MathError> {
    NTTFriendlyPrimesGenerator::new(bit_size, nth_root).next_upstream_prime()
}

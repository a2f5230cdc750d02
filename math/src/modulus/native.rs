//! Machine-word modular integer.
//!
//! [NativeInt] wraps a `u64` whose modulus is supplied per operation.
//! The `*_fast` variants require operands already reduced modulo the
//! modulus; the others reduce their operands first.

use crate::error::MathError;
use crate::modulus::impl_u64::barrett::{barrett_reduce, compute_mu, BARRETT_MAX_BITS};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NativeInt(pub u64);

impl From<u64> for NativeInt {
    fn from(value: u64) -> Self {
        NativeInt(value)
    }
}

impl fmt::Display for NativeInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl NativeInt {
    #[inline(always)]
    pub const fn new(value: u64) -> Self {
        NativeInt(value)
    }

    #[inline(always)]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Bit-length of the value, 0 for 0.
    #[inline(always)]
    pub const fn msb(self) -> u32 {
        u64::BITS - self.0.leading_zeros()
    }

    /// Returns the Barrett constant `floor(2^(2 * msb + 3) / self)` of `self`
    /// taken as a modulus.
    pub fn compute_mu(self) -> Result<u128, MathError> {
        if self.0 < 2 || self.msb() > BARRETT_MAX_BITS {
            return Err(MathError::InvalidModulus {
                modulus: self.0,
                reason: "Barrett reduction requires 2 <= q < 2^62",
            });
        }
        Ok(compute_mu(self.0))
    }

    #[inline(always)]
    pub fn mod_reduce(self, modulus: NativeInt) -> NativeInt {
        NativeInt(self.0 % modulus.0)
    }

    /// (self + b) mod modulus for arbitrary operands.
    #[inline(always)]
    pub fn mod_add(self, b: NativeInt, modulus: NativeInt) -> NativeInt {
        self.mod_reduce(modulus)
            .mod_add_fast(b.mod_reduce(modulus), modulus)
    }

    /// (self + b) mod modulus for operands in [0, modulus).
    #[inline(always)]
    pub fn mod_add_fast(self, b: NativeInt, modulus: NativeInt) -> NativeInt {
        let (r, carry) = self.0.overflowing_add(b.0);
        if carry || r >= modulus.0 {
            NativeInt(r.wrapping_sub(modulus.0))
        } else {
            NativeInt(r)
        }
    }

    /// (self - b) mod modulus for arbitrary operands.
    #[inline(always)]
    pub fn mod_sub(self, b: NativeInt, modulus: NativeInt) -> NativeInt {
        self.mod_reduce(modulus)
            .mod_sub_fast(b.mod_reduce(modulus), modulus)
    }

    /// (self - b) mod modulus for operands in [0, modulus).
    #[inline(always)]
    pub fn mod_sub_fast(self, b: NativeInt, modulus: NativeInt) -> NativeInt {
        if self.0 >= b.0 {
            NativeInt(self.0 - b.0)
        } else {
            NativeInt(self.0.wrapping_sub(b.0).wrapping_add(modulus.0))
        }
    }

    /// (self * b) mod modulus for arbitrary operands.
    #[inline(always)]
    pub fn mod_mul(self, b: NativeInt, modulus: NativeInt) -> NativeInt {
        NativeInt(((self.0 as u128 * b.0 as u128) % modulus.0 as u128) as u64)
    }

    /// (self * b) mod modulus for operands in [0, modulus) using Barrett
    /// reduction with `mu` from [NativeInt::compute_mu].
    #[inline(always)]
    pub fn mod_mul_fast(self, b: NativeInt, modulus: NativeInt, mu: u128) -> NativeInt {
        debug_assert!(self.0 < modulus.0 && b.0 < modulus.0);
        NativeInt::mod_barrett(self.0 as u128 * b.0 as u128, modulus, mu)
    }

    /// Barrett reduction of a double-width x < modulus^2.
    #[inline(always)]
    pub fn mod_barrett(x: u128, modulus: NativeInt, mu: u128) -> NativeInt {
        NativeInt(barrett_reduce(x, modulus.0, modulus.msb(), mu))
    }

    /// Returns floor(self * 2^64 / modulus), the Shoup quotient of `self`
    /// as a fixed multiplicand. Requires self < modulus.
    #[inline(always)]
    pub fn prep_mod_mul_const(self, modulus: NativeInt) -> NativeInt {
        debug_assert!(self.0 < modulus.0);
        NativeInt((((self.0 as u128) << 64) / modulus.0 as u128) as u64)
    }

    /// (self * b) mod modulus with `b_inv = b.prep_mod_mul_const(modulus)`.
    /// Requires modulus < 2^63.
    #[inline(always)]
    pub fn mod_mul_fast_const(
        self,
        b: NativeInt,
        modulus: NativeInt,
        b_inv: NativeInt,
    ) -> NativeInt {
        let t: u64 = ((b_inv.0 as u128 * self.0 as u128) >> 64) as u64;
        let r: u64 = self
            .0
            .wrapping_mul(b.0)
            .wrapping_sub(t.wrapping_mul(modulus.0));
        if r >= modulus.0 {
            NativeInt(r - modulus.0)
        } else {
            NativeInt(r)
        }
    }

    /// self^exponent mod modulus.
    pub fn mod_exp(self, exponent: NativeInt, modulus: NativeInt) -> NativeInt {
        if modulus.0 == 1 {
            return NativeInt(0);
        }
        let mut base: NativeInt = self.mod_reduce(modulus);
        let mut y: NativeInt = NativeInt(1);
        let mut e: u64 = exponent.0;
        while e > 0 {
            if e & 1 == 1 {
                y = y.mod_mul(base, modulus);
            }
            base = base.mod_mul(base, modulus);
            e >>= 1;
        }
        y
    }

    /// self^-1 mod modulus by the extended Euclidean algorithm.
    pub fn mod_inverse(self, modulus: NativeInt) -> Result<NativeInt, MathError> {
        if modulus.0 == 0 {
            return Err(MathError::DivisionByZero);
        }

        let (mut r0, mut r1): (i128, i128) = (modulus.0 as i128, (self.0 % modulus.0) as i128);
        let (mut t0, mut t1): (i128, i128) = (0, 1);

        while r1 != 0 {
            let quotient: i128 = r0 / r1;
            (r0, r1) = (r1, r0 - quotient * r1);
            (t0, t1) = (t1, t0 - quotient * t1);
        }

        if r0 != 1 {
            return Err(MathError::NotInvertible {
                value: self.0,
                modulus: modulus.0,
            });
        }

        Ok(NativeInt(t0.rem_euclid(modulus.0 as i128) as u64))
    }

    pub fn add_checked(self, b: NativeInt) -> Result<NativeInt, MathError> {
        self.0
            .checked_add(b.0)
            .map(NativeInt)
            .ok_or(MathError::ArithmeticOverflow("add"))
    }

    pub fn sub_checked(self, b: NativeInt) -> Result<NativeInt, MathError> {
        self.0
            .checked_sub(b.0)
            .map(NativeInt)
            .ok_or(MathError::ArithmeticOverflow("sub"))
    }

    pub fn mul_checked(self, b: NativeInt) -> Result<NativeInt, MathError> {
        self.0
            .checked_mul(b.0)
            .map(NativeInt)
            .ok_or(MathError::ArithmeticOverflow("mul"))
    }

    /// Maps self in [0, modulus) to (-modulus/2, modulus/2].
    #[inline(always)]
    pub fn to_signed_centered(self, modulus: NativeInt) -> i64 {
        debug_assert!(self.0 < modulus.0);
        if self.0 > modulus.0 >> 1 {
            self.0 as i64 - modulus.0 as i64
        } else {
            self.0 as i64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: NativeInt = NativeInt(0x1fffffffffe00001);

    #[test]
    fn add_sub_unreduced_operands() {
        let a: NativeInt = NativeInt(Q.0 + 5);
        let b: NativeInt = NativeInt(3 * Q.0 + 7);
        assert_eq!(a.mod_add(b, Q), NativeInt(12));
        assert_eq!(a.mod_sub(b, Q), NativeInt(Q.0 - 2));
        assert_eq!(NativeInt(Q.0).mod_add(NativeInt(0), Q), NativeInt(0));
    }

    #[test]
    fn add_fast_near_word_boundary() {
        let q: NativeInt = NativeInt(u64::MAX - 58);
        let a: NativeInt = NativeInt(q.0 - 1);
        assert_eq!(a.mod_add_fast(a, q), NativeInt(q.0 - 2));
        assert_eq!(NativeInt(0).mod_sub_fast(NativeInt(1), q), NativeInt(q.0 - 1));
    }

    #[test]
    fn mul_variants_agree() {
        let mu: u128 = Q.compute_mu().unwrap();
        let a: NativeInt = NativeInt(0x1234567890abcdef % Q.0);
        let b: NativeInt = NativeInt(0x0fedcba987654321 % Q.0);
        let want: NativeInt = a.mod_mul(b, Q);
        assert_eq!(a.mod_mul_fast(b, Q, mu), want);
        let b_inv: NativeInt = b.prep_mod_mul_const(Q);
        assert_eq!(a.mod_mul_fast_const(b, Q, b_inv), want);
    }

    #[test]
    fn barrett_on_full_range() {
        let mu: u128 = Q.compute_mu().unwrap();
        let x: u128 = (Q.0 as u128 - 1) * (Q.0 as u128 - 1);
        assert_eq!(
            NativeInt::mod_barrett(x, Q, mu),
            NativeInt((x % Q.0 as u128) as u64)
        );
        assert!(NativeInt(1).compute_mu().is_err());
    }

    #[test]
    fn exp_and_inverse() {
        let a: NativeInt = NativeInt(123456789);
        let a_inv: NativeInt = a.mod_inverse(Q).unwrap();
        assert_eq!(a.mod_mul(a_inv, Q), NativeInt(1));
        assert_eq!(a.mod_exp(NativeInt(Q.0 - 1), Q), NativeInt(1));
        assert_eq!(a.mod_exp(NativeInt(Q.0 - 2), Q), a_inv);
    }

    #[test]
    fn inverse_errors() {
        assert_eq!(
            NativeInt(6).mod_inverse(NativeInt(9)),
            Err(MathError::NotInvertible { value: 6, modulus: 9 })
        );
        assert_eq!(
            NativeInt(9).mod_inverse(NativeInt(9)),
            Err(MathError::NotInvertible { value: 9, modulus: 9 })
        );
        assert_eq!(
            NativeInt(3).mod_inverse(NativeInt(0)),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(NativeInt(4).mod_inverse(NativeInt(9)), Ok(NativeInt(7)));
    }

    #[test]
    fn checked_arithmetic() {
        assert!(NativeInt(u64::MAX).add_checked(NativeInt(1)).is_err());
        assert!(NativeInt(0).sub_checked(NativeInt(1)).is_err());
        assert!(NativeInt(1 << 32).mul_checked(NativeInt(1 << 32)).is_err());
        assert_eq!(NativeInt(2).mul_checked(NativeInt(3)), Ok(NativeInt(6)));
    }

    #[test]
    fn signed_centered() {
        let q: NativeInt = NativeInt(17);
        assert_eq!(NativeInt(8).to_signed_centered(q), 8);
        assert_eq!(NativeInt(9).to_signed_centered(q), -8);
        assert_eq!(NativeInt(0).to_signed_centered(q), 0);
    }
}

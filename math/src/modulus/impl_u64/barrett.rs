use crate::error::MathError;
use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::ReduceOnce;
use crate::modulus::{BARRETT, FOURTIMES, NONE, ONCE, REDUCEMOD, TWICE};

/// Largest modulus bit-length supported by [BarrettPrecomp].
pub const BARRETT_MAX_BITS: u32 = 62;

/// Returns `floor(2^(2 * msb + 3) / q)` with `msb` the bit-length of `q`.
#[inline]
pub fn compute_mu(q: u64) -> u128 {
    debug_assert!(q > 1);
    let msb: u32 = u64::BITS - q.leading_zeros();
    debug_assert!(msb <= BARRETT_MAX_BITS);
    (1u128 << (2 * msb + 3)) / q as u128
}

/// Returns the 256-bit product of a and b as (lo, hi).
#[inline(always)]
pub fn widening_mul_u128(a: u128, b: u128) -> (u128, u128) {
    let (a_lo, a_hi) = (a as u64 as u128, a >> 64);
    let (b_lo, b_hi) = (b as u64 as u128, b >> 64);
    let ll: u128 = a_lo * b_lo;
    let lh: u128 = a_lo * b_hi;
    let hl: u128 = a_hi * b_lo;
    let hh: u128 = a_hi * b_hi;
    let mid: u128 = (ll >> 64) + (lh as u64 as u128) + (hl as u64 as u128);
    let lo: u128 = (ll as u64 as u128) | (mid << 64);
    let hi: u128 = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (lo, hi)
}

/// Returns x - qe * q with qe the Barrett estimate of x / q.
/// The result lies in [0, 3q) for x < 2^(2 * msb).
#[inline(always)]
pub fn barrett_reduce_lazy(x: u128, q: u64, msb: u32, mu: u128) -> u64 {
    let qe: u128 = x >> (msb - 2);
    let (lo, hi) = widening_mul_u128(qe, mu);
    let shift: u32 = msb + 5;
    let qe: u128 = (lo >> shift) | (hi << (128 - shift));
    (x - qe * q as u128) as u64
}

/// Returns x mod q for x < 2^(2 * msb) given mu = floor(2^(2 * msb + 3) / q).
#[inline(always)]
pub fn barrett_reduce(x: u128, q: u64, msb: u32, mu: u128) -> u64 {
    let mut r: u64 = barrett_reduce_lazy(x, q, msb, mu);
    while r >= q {
        r -= q;
    }
    r
}

impl BarrettPrecomp<u64> {
    pub fn new(q: u64) -> Result<BarrettPrecomp<u64>, MathError> {
        let msb: u32 = u64::BITS - q.leading_zeros();
        if q < 2 || msb > BARRETT_MAX_BITS {
            return Err(MathError::InvalidModulus {
                modulus: q,
                reason: "Barrett reduction requires 2 <= q < 2^62",
            });
        }
        Ok(Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            msb,
            mu: compute_mu(q),
        })
    }

    /// Applies a modular reduction on x based on REDUCE:
    /// - NONE: no modular reduction.
    /// - ONCE: subtracts q if x >= q.
    /// - TWICE: subtracts 2q if x >= 2q.
    /// - FOURTIMES: subtracts 4q if x >= 4q.
    /// - BARRETT: maps x to x mod q.
    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        match REDUCE {
            NONE => {}
            ONCE => x.reduce_once_assign(self.q),
            TWICE => x.reduce_once_assign(self.two_q),
            FOURTIMES => x.reduce_once_assign(self.four_q),
            BARRETT => {
                if self.msb >= 32 {
                    *x = barrett_reduce(*x as u128, self.q, self.msb, self.mu)
                } else {
                    *x %= self.q
                }
            }
            _ => unreachable!("invalid REDUCE argument"),
        }
    }

    #[inline(always)]
    pub fn reduce<const REDUCE: REDUCEMOD>(&self, x: &u64) -> u64 {
        let mut r: u64 = *x;
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    /// Returns x mod q for a double-width x < q^2.
    #[inline(always)]
    pub fn reduce_u128(&self, x: u128) -> u64 {
        debug_assert!(
            x < (self.q as u128) * (self.q as u128),
            "invalid argument x: x = {} >= q^2",
            x
        );
        barrett_reduce(x, self.q, self.msb, self.mu)
    }

    /// Returns a * b mod q for a, b < q.
    /// With REDUCE = NONE the result lies in [0, 3q).
    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.q, "a:{} q:{}", a, self.q);
        debug_assert!(b < self.q, "b:{} q:{}", b, self.q);
        let mut r: u64 = barrett_reduce_lazy(a as u128 * b as u128, self.q, self.msb, self.mu);
        if REDUCE != NONE {
            r.reduce_once_assign(self.two_q);
            r.reduce_once_assign(self.q);
        }
        r
    }

    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(&self, a: u64, b: &mut u64) {
        *b = self.mul_external::<REDUCE>(a, *b)
    }
}

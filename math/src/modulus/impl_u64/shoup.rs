use crate::modulus::shoup::{Shoup, ShoupPrecomp};
use crate::modulus::ReduceOnce;

impl ShoupPrecomp<u64> {
    pub fn new(q: u64) -> Self {
        debug_assert!(q < 0x8000000000000000, "q >= 2^63");
        let mut precomp: ShoupPrecomp<u64> = Self {
            q,
            one: Shoup(0, 0),
        };
        precomp.one = precomp.prepare(1 % q);
        precomp
    }

    #[inline(always)]
    pub fn one(&self) -> Shoup<u64> {
        self.one
    }

    /// Returns (v, floor(v * 2^64 / q)).
    #[inline(always)]
    pub fn prepare(&self, v: u64) -> Shoup<u64> {
        debug_assert!(v < self.q, "v:{} q:{}", v, self.q);
        let quotient: u64 = (((v as u128) << 64) / self.q as u128) as _;
        Shoup(v, quotient)
    }

    /// Returns lhs * rhs mod q in [0, q).
    #[inline(always)]
    pub fn mul_external(&self, lhs: Shoup<u64>, rhs: u64) -> u64 {
        let mut r: u64 = self.mul_external_lazy(lhs, rhs);
        r.reduce_once_assign(self.q);
        r
    }

    #[inline(always)]
    pub fn mul_external_assign(&self, lhs: Shoup<u64>, rhs: &mut u64) {
        self.mul_external_lazy_assign(lhs, rhs);
        rhs.reduce_once_assign(self.q);
    }

    /// Returns lhs * rhs mod q in [0, 2q).
    #[inline(always)]
    pub fn mul_external_lazy(&self, lhs: Shoup<u64>, rhs: u64) -> u64 {
        let mut r: u64 = rhs;
        self.mul_external_lazy_assign(lhs, &mut r);
        r
    }

    #[inline(always)]
    pub fn mul_external_lazy_assign(&self, lhs: Shoup<u64>, rhs: &mut u64) {
        let t: u64 = ((*lhs.quotient() as u128 * *rhs as u128) >> 64) as _;
        *rhs = (rhs.wrapping_mul(*lhs.value())).wrapping_sub(self.q.wrapping_mul(t));
    }
}

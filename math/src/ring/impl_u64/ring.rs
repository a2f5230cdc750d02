use crate::automorphism::AutoPermMap;
use crate::dft::ntt::Table;
use crate::error::MathError;
use crate::modulus::prime::Prime;
use crate::modulus::VectorOperations;
use crate::modulus::{BARRETT, REDUCEMOD};
use crate::poly::Poly;
use crate::ring::Ring;
use crate::CHUNK;

impl Ring<u64> {
    /// Returns the ring Z_q[X]/(X^n+1).
    /// Fails if n is not a power of two, if q is not a prime or if q != 1 mod 2n.
    pub fn new(n: usize, q: u64) -> Result<Self, MathError> {
        Self::from_prime(n, Prime::<u64>::new(q)?)
    }

    pub fn from_prime(n: usize, prime: Prime<u64>) -> Result<Self, MathError> {
        if n < 2 || n & (n - 1) != 0 {
            return Err(MathError::InvalidRingDimension(n));
        }
        let table: Table<u64> = Table::<u64>::new(prime.clone(), (2 * n) as u64)?;
        let mut auto_perms: AutoPermMap = AutoPermMap::new();
        auto_perms.prepare(n, 2 * n - 1)?;
        Ok(Self {
            n,
            modulus: prime,
            dft: Box::new(table),
            auto_perms,
        })
    }
}

impl Ring<u64> {
    pub fn ntt_inplace<const LAZY: bool>(&self, poly: &mut Poly<u64>) {
        match LAZY {
            true => self.dft.forward_inplace_lazy(&mut poly.0),
            false => self.dft.forward_inplace(&mut poly.0),
        }
    }

    pub fn intt_inplace<const LAZY: bool>(&self, poly: &mut Poly<u64>) {
        match LAZY {
            true => self.dft.backward_inplace_lazy(&mut poly.0),
            false => self.dft.backward_inplace(&mut poly.0),
        }
    }

    pub fn ntt<const LAZY: bool>(&self, poly_in: &Poly<u64>, poly_out: &mut Poly<u64>) {
        poly_out.0.copy_from_slice(&poly_in.0);
        self.ntt_inplace::<LAZY>(poly_out);
    }
}

impl Ring<u64> {
    #[inline(always)]
    pub fn add_inplace<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_add_vb_into_vb::<CHUNK, REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn add<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_add_vb_into_vc::<CHUNK, REDUCE>(&a.0, &b.0, &mut c.0);
    }

    /// b <- b - a
    #[inline(always)]
    pub fn sub_inplace<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_sub_vb_into_va::<CHUNK, REDUCE>(&a.0, &mut b.0);
    }

    /// c <- a - b
    #[inline(always)]
    pub fn sub<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_sub_vb_into_vc::<CHUNK, REDUCE>(&a.0, &b.0, &mut c.0);
    }

    #[inline(always)]
    pub fn neg<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus.va_neg_into_vb::<CHUNK, REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn neg_inplace<const REDUCE: REDUCEMOD>(&self, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        self.modulus.va_neg_into_va::<CHUNK, REDUCE>(&mut a.0);
    }

    /// Pointwise product c <- a * b; a and b must be in the evaluation domain.
    #[inline(always)]
    pub fn mul<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_mul_vb_into_vc::<CHUNK, REDUCE>(&a.0, &b.0, &mut c.0);
    }

    /// Pointwise product b <- a * b.
    #[inline(always)]
    pub fn mul_inplace<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus.va_mul_vb_into_vb::<CHUNK, REDUCE>(&a.0, &mut b.0);
    }

    /// Pointwise c <- c + a * b.
    #[inline(always)]
    pub fn mul_add_inplace<const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<u64>,
        b: &Poly<u64>,
        c: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_mul_vb_add_vc_into_vc::<CHUNK, REDUCE>(&a.0, &b.0, &mut c.0);
    }

    /// Reduces every coefficient of a to [0, q).
    #[inline(always)]
    pub fn reduce_inplace(&self, a: &mut Poly<u64>) {
        self.modulus.va_reduce_into_va::<CHUNK, BARRETT>(&mut a.0);
    }
}

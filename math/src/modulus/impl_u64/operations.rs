use crate::modulus::prime::Prime;
use crate::modulus::{ScalarOperations, VectorOperations};
use crate::modulus::{ONCE, REDUCEMOD};
use crate::{apply_v, apply_vv, apply_vvv};
use itertools::izip;

impl ScalarOperations<u64> for Prime<u64> {
    #[inline(always)]
    fn sa_reduce_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut u64) {
        self.barrett.reduce_assign::<REDUCE>(a);
    }

    #[inline(always)]
    fn sa_add_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &u64, c: &mut u64) {
        *c = a.wrapping_add(*b);
        self.sa_reduce_into_sa::<REDUCE>(c);
    }

    #[inline(always)]
    fn sa_add_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        *b = a.wrapping_add(*b);
        self.sa_reduce_into_sa::<REDUCE>(b);
    }

    #[inline(always)]
    fn sa_sub_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &u64, c: &mut u64) {
        *c = a.wrapping_add(self.q.wrapping_sub(*b));
        self.sa_reduce_into_sa::<REDUCE>(c);
    }

    #[inline(always)]
    fn sa_sub_sb_into_sa<const REDUCE: REDUCEMOD>(&self, b: &u64, a: &mut u64) {
        *a = a.wrapping_add(self.q.wrapping_sub(*b));
        self.sa_reduce_into_sa::<REDUCE>(a);
    }

    #[inline(always)]
    fn sa_neg_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut u64) {
        *a = self.q.wrapping_sub(*a);
        self.sa_reduce_into_sa::<REDUCE>(a)
    }

    #[inline(always)]
    fn sa_neg_into_sb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        *b = self.q.wrapping_sub(*a);
        self.sa_reduce_into_sa::<REDUCE>(b)
    }

    #[inline(always)]
    fn sa_mul_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &u64, c: &mut u64) {
        *c = self.barrett.mul_external::<REDUCE>(*a, *b);
    }

    #[inline(always)]
    fn sa_mul_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        self.barrett.mul_external_assign::<REDUCE>(*a, b);
    }

    #[inline(always)]
    fn sa_mul_sb_add_sc_into_sc<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &u64, c: &mut u64) {
        *c += self.barrett.mul_external::<ONCE>(*a, *b);
        self.sa_reduce_into_sa::<REDUCE>(c);
    }
}

impl VectorOperations<u64> for Prime<u64> {
    #[inline(always)]
    fn va_reduce_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &mut [u64]) {
        apply_v!(self, Self::sa_reduce_into_sa::<REDUCE>, a, CHUNK);
    }

    #[inline(always)]
    fn va_add_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &[u64],
        c: &mut [u64],
    ) {
        apply_vvv!(self, Self::sa_add_sb_into_sc::<REDUCE>, a, b, c, CHUNK);
    }

    #[inline(always)]
    fn va_add_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &mut [u64],
    ) {
        apply_vv!(self, Self::sa_add_sb_into_sb::<REDUCE>, a, b, CHUNK);
    }

    #[inline(always)]
    fn va_sub_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &[u64],
        c: &mut [u64],
    ) {
        apply_vvv!(self, Self::sa_sub_sb_into_sc::<REDUCE>, a, b, c, CHUNK);
    }

    #[inline(always)]
    fn va_sub_vb_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        b: &[u64],
        a: &mut [u64],
    ) {
        apply_vv!(self, Self::sa_sub_sb_into_sa::<REDUCE>, b, a, CHUNK);
    }

    #[inline(always)]
    fn va_neg_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &mut [u64]) {
        apply_v!(self, Self::sa_neg_into_sa::<REDUCE>, a, CHUNK);
    }

    #[inline(always)]
    fn va_neg_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &mut [u64],
    ) {
        apply_vv!(self, Self::sa_neg_into_sb::<REDUCE>, a, b, CHUNK);
    }

    #[inline(always)]
    fn va_mul_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &[u64],
        c: &mut [u64],
    ) {
        apply_vvv!(self, Self::sa_mul_sb_into_sc::<REDUCE>, a, b, c, CHUNK);
    }

    #[inline(always)]
    fn va_mul_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &mut [u64],
    ) {
        apply_vv!(self, Self::sa_mul_sb_into_sb::<REDUCE>, a, b, CHUNK);
    }

    #[inline(always)]
    fn va_mul_vb_add_vc_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &[u64],
        c: &mut [u64],
    ) {
        apply_vvv!(self, Self::sa_mul_sb_add_sc_into_sc::<REDUCE>, a, b, c, CHUNK);
    }
}

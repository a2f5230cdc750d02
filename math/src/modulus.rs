pub mod barrett;
pub mod impl_u64;
pub mod native;
pub mod prime;
pub mod shoup;

pub type REDUCEMOD = u8;

pub const NONE: REDUCEMOD = 0;
pub const ONCE: REDUCEMOD = 1;
pub const TWICE: REDUCEMOD = 2;
pub const FOURTIMES: REDUCEMOD = 3;
pub const BARRETT: REDUCEMOD = 4;

pub trait WordOps<O> {
    fn log2(self) -> O;
    fn reverse_bits_msb(self, n: u32) -> O;
    fn mask(self) -> O;
}

impl WordOps<u64> for u64 {
    #[inline(always)]
    fn log2(self) -> u64 {
        (u64::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> u64 {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (u64::BITS - n)
    }
    #[inline(always)]
    fn mask(self) -> u64 {
        if self.log2() >= 64 {
            return u64::MAX;
        }
        (1 << self.log2()) - 1
    }
}

impl WordOps<usize> for usize {
    #[inline(always)]
    fn log2(self) -> usize {
        (usize::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> usize {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (usize::BITS - n)
    }
    #[inline(always)]
    fn mask(self) -> usize {
        (1 << self.log2()) - 1
    }
}

/// Conditional subtraction of q. Callers keep inputs below 2q.
pub trait ReduceOnce<O> {
    fn reduce_once_assign(&mut self, q: O);
    fn reduce_once(&self, q: O) -> O;
}

/// Element-wise arithmetic modulo a prime, with the output reduction chosen
/// by REDUCE. Names read as `<lhs>_<op>_<rhs>_into_<destination>`, with `s`
/// for a scalar and `v` for a slice.
pub trait ScalarOperations<O> {
    fn sa_reduce_into_sa<const REDUCE: REDUCEMOD>(&self, x: &mut O);
    fn sa_add_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &O, b: &O, c: &mut O);
    fn sa_add_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);
    fn sa_sub_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &O, b: &O, c: &mut O);
    fn sa_sub_sb_into_sa<const REDUCE: REDUCEMOD>(&self, b: &O, a: &mut O);
    fn sa_neg_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut O);
    fn sa_neg_into_sb<const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);
    /// Barrett product.
    fn sa_mul_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &O, b: &O, c: &mut O);
    fn sa_mul_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);
    /// c += a * b.
    fn sa_mul_sb_add_sc_into_sc<const REDUCE: REDUCEMOD>(&self, a: &O, b: &O, c: &mut O);
}

pub trait VectorOperations<O> {
    fn va_reduce_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, x: &mut [O]);
    fn va_add_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &[O],
        c: &mut [O],
    );
    fn va_add_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);
    fn va_sub_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &[O],
        c: &mut [O],
    );
    fn va_sub_vb_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, b: &[O], a: &mut [O]);
    fn va_neg_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &mut [O]);
    fn va_neg_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);
    fn va_mul_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &[O],
        c: &mut [O],
    );
    fn va_mul_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);
    /// c += a * b, element-wise.
    fn va_mul_vb_add_vc_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &[O],
        c: &mut [O],
    );
}

pub mod barrett;
pub mod generation;
pub mod operations;
pub mod prime;
pub mod shoup;

use crate::modulus::ReduceOnce;

impl ReduceOnce<u64> for u64 {
    #[inline(always)]
    fn reduce_once_assign(&mut self, q: u64) {
        debug_assert!(q < 1 << 63, "2q overflows u64");
        *self = (*self).min(self.wrapping_sub(q))
    }

    #[inline(always)]
    fn reduce_once(&self, q: u64) -> u64 {
        debug_assert!(q < 1 << 63, "2q overflows u64");
        (*self).min(self.wrapping_sub(q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_once_subtracts_at_most_q() {
        let q: u64 = 0x1fffffffffe00001;
        for x in [0, 1, q - 1, q, q + 1, 2 * q - 1] {
            let want: u64 = if x >= q { x - q } else { x };
            assert_eq!(x.reduce_once(q), want);
            let mut y: u64 = x;
            y.reduce_once_assign(q);
            assert_eq!(y, want);
        }
    }
}

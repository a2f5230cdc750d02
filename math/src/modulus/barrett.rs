/// Precomputations for Barrett reduction of double-width values
/// modulo `q`, with `mu = floor(2^(2 * msb + 3) / q)` where `msb`
/// is the bit-length of `q`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrettPrecomp<O> {
    pub q: O,
    pub two_q: O,
    pub four_q: O,
    pub msb: u32,
    pub mu: u128,
}

impl<O> BarrettPrecomp<O> {
    #[inline(always)]
    pub fn mu(&self) -> u128 {
        self.mu
    }

    #[inline(always)]
    pub fn msb(&self) -> u32 {
        self.msb
    }
}

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
pub use rand_core::RngCore;

/// Deterministic stream of randomness seeded from 32 bytes.
pub struct Source {
    source: ChaCha8Rng,
}

/// Returns a fresh 32-byte seed drawn from the thread-local generator.
pub fn new_seed() -> [u8; 32] {
    let mut seed: [u8; 32] = [0u8; 32];
    rand::rng().fill_bytes(&mut seed);
    seed
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.source.fill_bytes(&mut seed);
        seed
    }

    /// Returns an independent stream derived from this one.
    pub fn branch(&mut self) -> Self {
        Source::new(self.new_seed())
    }

    /// Returns `count` independent streams, in a deterministic order.
    pub fn branches(&mut self, count: usize) -> Vec<Self> {
        (0..count).map(|_| self.branch()).collect()
    }

    /// Uniform in [0, max) by rejection on `next_u64() & mask`.
    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a: Source = Source::new([7u8; 32]);
        let mut b: Source = Source::new([7u8; 32]);
        (0..16).for_each(|_| assert_eq!(a.next_u64(), b.next_u64()));
    }

    #[test]
    fn branches_are_reproducible() {
        let mut a: Source = Source::new([3u8; 32]);
        let mut b: Source = Source::new([3u8; 32]);
        let mut ba: Vec<Source> = a.branches(4);
        let mut bb: Vec<Source> = b.branches(4);
        ba.iter_mut()
            .zip(bb.iter_mut())
            .for_each(|(x, y)| assert_eq!(x.next_u64(), y.next_u64()));
    }

    #[test]
    fn fresh_seeds_differ() {
        let mut a: Source = Source::new(new_seed());
        let mut b: Source = Source::new(new_seed());
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn next_u64n_in_range() {
        let mut source: Source = Source::new([1u8; 32]);
        let max: u64 = 1000;
        let mask: u64 = 1023;
        (0..1000).for_each(|_| assert!(source.next_u64n(max, mask) < max));
    }
}

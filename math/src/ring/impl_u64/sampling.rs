use crate::modulus::WordOps;
use crate::poly::Poly;
use crate::ring::Ring;
use sampling::distributions::{DiscreteGaussian, Distribution};
use sampling::source::Source;

impl Ring<u64> {
    pub fn fill_uniform(&self, source: &mut Source, a: &mut Poly<u64>) {
        let max: u64 = self.modulus.q;
        let mask: u64 = max.mask();
        a.0.iter_mut()
            .for_each(|a| *a = source.next_u64n(max, mask));
    }

    pub fn fill_gaussian(&self, source: &mut Source, dist: &DiscreteGaussian, a: &mut Poly<u64>) {
        let q: u64 = self.modulus.q;
        a.0.iter_mut().for_each(|a| *a = dist.sample_mod(source, q));
    }

    /// Fills a with values drawn from {-1, 0, 1} mapped to [0, q).
    pub fn fill_ternary(&self, source: &mut Source, a: &mut Poly<u64>) {
        let q: u64 = self.modulus.q;
        a.0.iter_mut().for_each(|a| {
            *a = match Distribution::Ternary.sample_i64(source) {
                -1 => q - 1,
                x => x as u64,
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_reduced() {
        let ring: Ring<u64> = Ring::new(16, 12289).unwrap();
        let mut source: Source = Source::new([0u8; 32]);
        let mut a: Poly<u64> = ring.new_poly();

        ring.fill_uniform(&mut source, &mut a);
        assert!(a.0.iter().all(|x| *x < 12289));

        let dist: DiscreteGaussian = DiscreteGaussian::new(3.19).unwrap();
        ring.fill_gaussian(&mut source, &dist, &mut a);
        assert!(a
            .0
            .iter()
            .all(|x| *x <= dist.bound() as u64 || *x >= 12289 - dist.bound() as u64));

        ring.fill_ternary(&mut source, &mut a);
        assert!(a.0.iter().all(|x| [0, 1, 12288].contains(x)));
    }
}

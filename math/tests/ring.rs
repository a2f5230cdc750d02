use std::sync::Arc;

use math::modulus::impl_u64::generation::first_prime;
use math::poly::{Format, NativePoly, Poly};
use math::ring::Ring;
use sampling::distributions::DiscreteGaussian;
use sampling::source::Source;

#[test]
fn ring_u64() {
    let n: usize = 1 << 9;
    let ring: Arc<Ring<u64>> =
        Arc::new(Ring::from_prime(n, first_prime(31, 2 * n as u64).unwrap()).unwrap());

    sub_test("test_ntt_round_trip", || test_ntt_round_trip(&ring));
    sub_test("test_gaussian_format", || test_gaussian_format(&ring));
    sub_test("test_automorphism_composition::<NTT:false>", || {
        test_automorphism_composition(&ring, Format::Coefficient)
    });
    sub_test("test_automorphism_composition::<NTT:true>", || {
        test_automorphism_composition(&ring, Format::Evaluation)
    });
    sub_test("test_transpose_involution", || test_transpose_involution(&ring));
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

fn test_ntt_round_trip(ring: &Arc<Ring<u64>>) {
    let mut source: Source = Source::new([0u8; 32]);
    let mut a: Poly<u64> = ring.new_poly();
    ring.fill_uniform(&mut source, &mut a);
    let b: Poly<u64> = a.clone();
    ring.ntt_inplace::<true>(&mut a);
    ring.intt_inplace::<false>(&mut a);
    assert_eq!(a, b);
}

fn test_gaussian_format(ring: &Arc<Ring<u64>>) {
    let mut source_a: Source = Source::new([1u8; 32]);
    let mut source_b: Source = Source::new([1u8; 32]);
    let dist: DiscreteGaussian = DiscreteGaussian::new(3.19).unwrap();
    let a: NativePoly = NativePoly::from_gaussian(ring, &mut source_a, &dist, Format::Coefficient);
    let mut b: NativePoly =
        NativePoly::from_gaussian(ring, &mut source_b, &dist, Format::Evaluation);
    assert_eq!(b.format(), Format::Evaluation);
    b.set_format(Format::Coefficient);
    assert_eq!(a, b);
}

fn test_automorphism_composition(ring: &Arc<Ring<u64>>, format: Format) {
    let mut source: Source = Source::new([2u8; 32]);
    let mut a: NativePoly = NativePoly::from_uniform(ring, &mut source, Format::Coefficient);
    a.set_format(format);
    let nth_root: usize = ring.cyclotomic_order();
    let (g1, g2) = (5usize, 3usize);
    let lhs: NativePoly = a
        .automorphism(g1)
        .unwrap()
        .automorphism(g2)
        .unwrap();
    let rhs: NativePoly = a.automorphism((g1 * g2) % nth_root).unwrap();
    assert_eq!(lhs, rhs);
}

fn test_transpose_involution(ring: &Arc<Ring<u64>>) {
    let mut source: Source = Source::new([3u8; 32]);
    let a: NativePoly = NativePoly::from_uniform(ring, &mut source, Format::Evaluation);
    let b: NativePoly = a.transpose().unwrap().transpose().unwrap();
    assert_eq!(a, b);
}

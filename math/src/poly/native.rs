use std::sync::Arc;

use crate::error::MathError;
use crate::modulus::{BARRETT, ONCE};
use crate::poly::{Format, Poly};
use crate::ring::Ring;
use sampling::distributions::DiscreteGaussian;
use sampling::source::Source;

/// Element of Z_q[X]/(X^n+1) tagged with its [Format].
///
/// Binary operations require both operands to share the same ring
/// parameters and the same format.
#[derive(Clone, Debug)]
pub struct NativePoly {
    ring: Arc<Ring<u64>>,
    format: Format,
    poly: Poly<u64>,
}

impl PartialEq for NativePoly {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format && self.same_ring(other) && self.poly == other.poly
    }
}

impl Eq for NativePoly {}

impl NativePoly {
    pub fn zero(ring: &Arc<Ring<u64>>, format: Format) -> Self {
        Self {
            ring: ring.clone(),
            format,
            poly: ring.new_poly(),
        }
    }

    /// Values are reduced modulo q.
    pub fn from_values(
        ring: &Arc<Ring<u64>>,
        values: &[u64],
        format: Format,
    ) -> Result<Self, MathError> {
        let mut poly: NativePoly = Self::zero(ring, format);
        poly.set_values(values, format)?;
        Ok(poly)
    }

    /// Uniform over Z_q^n, identically distributed in both formats.
    pub fn from_uniform(ring: &Arc<Ring<u64>>, source: &mut Source, format: Format) -> Self {
        let mut poly: NativePoly = Self::zero(ring, format);
        ring.fill_uniform(source, &mut poly.poly);
        poly
    }

    /// Coefficients drawn from dist, then moved to format.
    pub fn from_gaussian(
        ring: &Arc<Ring<u64>>,
        source: &mut Source,
        dist: &DiscreteGaussian,
        format: Format,
    ) -> Self {
        let mut poly: NativePoly = Self::zero(ring, Format::Coefficient);
        ring.fill_gaussian(source, dist, &mut poly.poly);
        poly.set_format(format);
        poly
    }

    /// Coefficients drawn from {-1, 0, 1}, then moved to format.
    pub fn from_ternary(ring: &Arc<Ring<u64>>, source: &mut Source, format: Format) -> Self {
        let mut poly: NativePoly = Self::zero(ring, Format::Coefficient);
        ring.fill_ternary(source, &mut poly.poly);
        poly.set_format(format);
        poly
    }

    pub fn ring(&self) -> &Arc<Ring<u64>> {
        &self.ring
    }

    pub fn n(&self) -> usize {
        self.ring.n()
    }

    pub fn modulus(&self) -> u64 {
        self.ring.q()
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn values(&self) -> &[u64] {
        &self.poly.0
    }

    pub fn values_mut(&mut self) -> &mut [u64] {
        &mut self.poly.0
    }

    /// Retags self as format without transforming it and returns its
    /// values for overwriting. Written values must be reduced modulo q.
    pub fn overwrite_as(&mut self, format: Format) -> &mut [u64] {
        self.format = format;
        &mut self.poly.0
    }

    /// Overwrites the values and the format tag. Values are reduced modulo q.
    pub fn set_values(&mut self, values: &[u64], format: Format) -> Result<(), MathError> {
        if values.len() != self.n() {
            return Err(MathError::LengthMismatch {
                expected: self.n(),
                got: values.len(),
            });
        }
        self.poly.0.copy_from_slice(values);
        self.ring.reduce_inplace(&mut self.poly);
        self.format = format;
        Ok(())
    }

    pub fn set_values_to_zero(&mut self) {
        self.poly.zero()
    }

    /// Moves to format with a forward or backward NTT; no-op if already in format.
    pub fn set_format(&mut self, format: Format) {
        if self.format != format {
            self.switch_format()
        }
    }

    pub fn switch_format(&mut self) {
        match self.format {
            Format::Coefficient => {
                self.ring.ntt_inplace::<false>(&mut self.poly);
                self.format = Format::Evaluation;
            }
            Format::Evaluation => {
                self.ring.intt_inplace::<false>(&mut self.poly);
                self.format = Format::Coefficient;
            }
        }
    }

    fn same_ring(&self, other: &NativePoly) -> bool {
        Arc::ptr_eq(&self.ring, &other.ring)
            || (self.ring.n() == other.ring.n() && self.ring.q() == other.ring.q())
    }

    fn check_compatible(&self, other: &NativePoly) -> Result<(), MathError> {
        if !self.same_ring(other) {
            return Err(MathError::RingMismatch);
        }
        if self.format != other.format {
            return Err(MathError::FormatMismatch {
                lhs: self.format,
                rhs: other.format,
            });
        }
        Ok(())
    }

    fn check_format(&self, expected: Format) -> Result<(), MathError> {
        if self.format != expected {
            return Err(MathError::InvalidFormat {
                expected,
                got: self.format,
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &NativePoly) -> Result<NativePoly, MathError> {
        let mut r: NativePoly = self.clone();
        r.add_inplace(other)?;
        Ok(r)
    }

    pub fn add_inplace(&mut self, other: &NativePoly) -> Result<(), MathError> {
        self.check_compatible(other)?;
        self.ring.add_inplace::<ONCE>(&other.poly, &mut self.poly);
        Ok(())
    }

    pub fn sub(&self, other: &NativePoly) -> Result<NativePoly, MathError> {
        let mut r: NativePoly = self.clone();
        r.sub_inplace(other)?;
        Ok(r)
    }

    pub fn sub_inplace(&mut self, other: &NativePoly) -> Result<(), MathError> {
        self.check_compatible(other)?;
        self.ring.sub_inplace::<ONCE>(&other.poly, &mut self.poly);
        Ok(())
    }

    /// Product in the ring; both operands must be in [Format::Evaluation].
    pub fn mul(&self, other: &NativePoly) -> Result<NativePoly, MathError> {
        let mut r: NativePoly = self.clone();
        r.mul_inplace(other)?;
        Ok(r)
    }

    pub fn mul_inplace(&mut self, other: &NativePoly) -> Result<(), MathError> {
        self.check_compatible(other)?;
        self.check_format(Format::Evaluation)?;
        self.ring.mul_inplace::<BARRETT>(&other.poly, &mut self.poly);
        Ok(())
    }

    /// self <- self + a * b, all in [Format::Evaluation].
    pub fn mul_add_inplace(&mut self, a: &NativePoly, b: &NativePoly) -> Result<(), MathError> {
        self.check_compatible(a)?;
        self.check_compatible(b)?;
        self.check_format(Format::Evaluation)?;
        self.ring
            .mul_add_inplace::<ONCE>(&a.poly, &b.poly, &mut self.poly);
        Ok(())
    }

    pub fn neg(&self) -> NativePoly {
        let mut r: NativePoly = self.clone();
        r.neg_inplace();
        r
    }

    pub fn neg_inplace(&mut self) {
        self.ring.neg_inplace::<ONCE>(&mut self.poly);
    }

    /// Returns self(X^gal_el), in the same format.
    pub fn automorphism(&self, gal_el: usize) -> Result<NativePoly, MathError> {
        let mut r: NativePoly = Self::zero(&self.ring, self.format);
        match self.format {
            Format::Coefficient => self
                .ring
                .automorphism::<false>(&self.poly, gal_el, &mut r.poly)?,
            Format::Evaluation => self
                .ring
                .automorphism::<true>(&self.poly, gal_el, &mut r.poly)?,
        }
        Ok(r)
    }

    /// Returns self(X^-1), the automorphism at 2n-1.
    /// Only defined in [Format::Evaluation].
    pub fn transpose(&self) -> Result<NativePoly, MathError> {
        self.check_format(Format::Evaluation)?;
        self.automorphism(self.ring.cyclotomic_order() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modulus::impl_u64::generation::first_prime;

    fn ring(n: usize) -> Arc<Ring<u64>> {
        Arc::new(Ring::from_prime(n, first_prime(31, 2 * n as u64).unwrap()).unwrap())
    }

    #[test]
    fn format_round_trip() {
        let ring: Arc<Ring<u64>> = ring(64);
        let mut source: Source = Source::new([1u8; 32]);
        let a: NativePoly = NativePoly::from_uniform(&ring, &mut source, Format::Coefficient);
        let mut b: NativePoly = a.clone();
        b.set_format(Format::Evaluation);
        assert_eq!(b.format(), Format::Evaluation);
        b.set_format(Format::Evaluation);
        b.set_format(Format::Coefficient);
        assert_eq!(a, b);
    }

    #[test]
    fn arithmetic_checks() {
        let ring_a: Arc<Ring<u64>> = ring(16);
        let ring_b: Arc<Ring<u64>> = ring(32);
        let a: NativePoly = NativePoly::zero(&ring_a, Format::Evaluation);
        let b: NativePoly = NativePoly::zero(&ring_a, Format::Coefficient);
        let c: NativePoly = NativePoly::zero(&ring_b, Format::Evaluation);

        assert_eq!(
            a.add(&b),
            Err(MathError::FormatMismatch {
                lhs: Format::Evaluation,
                rhs: Format::Coefficient
            })
        );
        assert_eq!(a.add(&c), Err(MathError::RingMismatch));
        assert_eq!(
            b.mul(&b),
            Err(MathError::InvalidFormat {
                expected: Format::Evaluation,
                got: Format::Coefficient
            })
        );
        assert!(b.transpose().is_err());
        assert!(a.transpose().is_ok());
    }

    #[test]
    fn monomial_product() {
        let n: usize = 16;
        let ring: Arc<Ring<u64>> = ring(n);
        let q: u64 = ring.q();
        let mut x: Vec<u64> = vec![0; n];
        x[n - 1] = 1;
        let mut a: NativePoly = NativePoly::from_values(&ring, &x, Format::Coefficient).unwrap();
        let mut b: NativePoly = a.clone();
        a.set_format(Format::Evaluation);
        b.set_format(Format::Evaluation);

        // X^(n-1) * X^(n-1) = X^(2n-2) = -X^(n-2)
        let mut c: NativePoly = a.mul(&b).unwrap();
        c.set_format(Format::Coefficient);
        let mut want: Vec<u64> = vec![0; n];
        want[n - 2] = q - 1;
        assert_eq!(c.values(), &want[..]);

        let mut d: NativePoly = NativePoly::zero(&ring, Format::Evaluation);
        d.mul_add_inplace(&a, &b).unwrap();
        d.mul_add_inplace(&a, &b).unwrap();
        d.set_format(Format::Coefficient);
        want[n - 2] = q - 2;
        assert_eq!(d.values(), &want[..]);
    }

    #[test]
    fn transpose_matches_coefficient_automorphism() {
        let n: usize = 32;
        let ring: Arc<Ring<u64>> = ring(n);
        let mut source: Source = Source::new([2u8; 32]);
        let a: NativePoly = NativePoly::from_uniform(&ring, &mut source, Format::Coefficient);
        let want: NativePoly = a.automorphism(2 * n - 1).unwrap();

        let mut b: NativePoly = a.clone();
        b.set_format(Format::Evaluation);
        let mut t: NativePoly = b.transpose().unwrap();
        t.set_format(Format::Coefficient);
        assert_eq!(t, want);
    }

    #[test]
    fn add_sub_neg() {
        let ring: Arc<Ring<u64>> = ring(8);
        let mut source: Source = Source::new([4u8; 32]);
        let a: NativePoly = NativePoly::from_uniform(&ring, &mut source, Format::Coefficient);
        let b: NativePoly = NativePoly::from_uniform(&ring, &mut source, Format::Coefficient);
        let c: NativePoly = a.add(&b).unwrap().sub(&b).unwrap();
        assert_eq!(a, c);
        let z: NativePoly = a.add(&a.neg()).unwrap();
        assert!(z.values().iter().all(|x| *x == 0));
        assert!(NativePoly::from_values(&ring, &[1, 2], Format::Coefficient).is_err());
    }
}

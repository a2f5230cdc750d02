use std::sync::Arc;

use math::poly::{Format, NativePoly};
use math::ring::Ring;

use crate::error::Result;
use crate::params::RingGSWParams;
use crate::rgsw::ciphertext::RingGSWCiphertext;
use crate::rgsw::decomposition::signed_digit_decompose;

/// RLWE accumulator (a, b) in evaluation format, with the scratch space of
/// the external product.
pub struct Accumulator {
    acc: [NativePoly; 2],
    coeffs: [NativePoly; 2],
    dct: Vec<NativePoly>,
    sum: [NativePoly; 2],
}

impl Accumulator {
    /// Returns the trivial encryption (0, test_vector).
    pub fn new(params: &RingGSWParams, mut test_vector: NativePoly) -> Self {
        let ring: &Arc<Ring<u64>> = params.ring();
        test_vector.set_format(Format::Evaluation);
        Self {
            acc: [NativePoly::zero(ring, Format::Evaluation), test_vector],
            coeffs: [
                NativePoly::zero(ring, Format::Coefficient),
                NativePoly::zero(ring, Format::Coefficient),
            ],
            dct: (0..params.digits_g2())
                .map(|_| NativePoly::zero(ring, Format::Coefficient))
                .collect(),
            sum: [
                NativePoly::zero(ring, Format::Evaluation),
                NativePoly::zero(ring, Format::Evaluation),
            ],
        }
    }

    pub fn acc(&self) -> &[NativePoly; 2] {
        &self.acc
    }

    pub fn into_inner(self) -> [NativePoly; 2] {
        self.acc
    }

    /// Signed decomposition of the accumulator, left in evaluation format in dct.
    fn decompose(&mut self, params: &RingGSWParams) {
        for (c, a) in self.coeffs.iter_mut().zip(self.acc.iter()) {
            c.clone_from(a);
            c.set_format(Format::Coefficient);
        }
        signed_digit_decompose(params, &self.coeffs, &mut self.dct);
        self.dct.iter_mut().for_each(|d| d.set_format(Format::Evaluation));
    }

    /// acc <- dct(acc) x input.
    pub fn add_to_acc_ap(
        &mut self,
        params: &RingGSWParams,
        input: &RingGSWCiphertext,
    ) -> Result<()> {
        debug_assert!(input.rows() == self.dct.len());
        self.decompose(params);
        for (j, acc) in self.acc.iter_mut().enumerate() {
            acc.set_values_to_zero();
            for (d, row) in self.dct.iter().zip(input.iter()) {
                acc.mul_add_inplace(d, &row[j])?;
            }
        }
        Ok(())
    }

    /// acc <- acc + (dct(acc) x input) * (X^(a * 2N/q) - 1).
    pub fn add_to_acc_ginx(
        &mut self,
        params: &RingGSWParams,
        input: &RingGSWCiphertext,
        a: u64,
    ) -> Result<()> {
        debug_assert!(input.rows() == self.dct.len());
        let big_n: usize = params.lwe().big_n;
        let factor: usize = 2 * big_n / params.lwe().q as usize;

        self.decompose(params);
        for (j, sum) in self.sum.iter_mut().enumerate() {
            sum.set_values_to_zero();
            for (d, row) in self.dct.iter().zip(input.iter()) {
                sum.mul_add_inplace(d, &row[j])?;
            }
        }

        let mut index: usize = a as usize * factor;
        if index == 2 * big_n {
            index = 0;
        }
        let monomial: &NativePoly = params.monomial(index);
        for (acc, sum) in self.acc.iter_mut().zip(self.sum.iter()) {
            acc.mul_add_inplace(sum, monomial)?;
        }
        Ok(())
    }
}

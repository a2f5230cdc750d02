use std::sync::Arc;

use math::modulus::native::NativeInt;
use math::poly::{Format, NativePoly};
use math::ring::Ring;
use sampling::distributions::DiscreteGaussian;
use sampling::source::Source;

use crate::error::Result;
use crate::params::RingGSWParams;
use crate::rgsw::ciphertext::RingGSWCiphertext;

/// Fresh rows (a_i uniform, e_i Gaussian) in coefficient format, with a
/// copy of every a_i kept aside before the gadget terms are added.
fn sample_rows(
    params: &RingGSWParams,
    source: &mut Source,
) -> (RingGSWCiphertext, Vec<NativePoly>) {
    let ring: &Arc<Ring<u64>> = params.ring();
    let dgg: &DiscreteGaussian = params.lwe().dgg();
    let rows: Vec<[NativePoly; 2]> = (0..params.digits_g2())
        .map(|_| {
            [
                NativePoly::from_uniform(ring, source, Format::Coefficient),
                NativePoly::from_gaussian(ring, source, dgg, Format::Coefficient),
            ]
        })
        .collect();
    let a: Vec<NativePoly> = rows.iter().map(|row| row[0].clone()).collect();
    (RingGSWCiphertext::from_rows(rows), a)
}

/// Adds `value * baseG^i` at coefficient `index` of rows 2i (first element)
/// and 2i+1 (second element), for every i < digits_g.
fn add_gadget(params: &RingGSWParams, ct: &mut RingGSWCiphertext, index: usize, negate: bool) {
    let big_q: NativeInt = NativeInt(params.lwe().big_q);
    for (i, &g) in params.g_power().iter().enumerate() {
        let g: NativeInt = if negate {
            NativeInt(0).mod_sub_fast(NativeInt(g), big_q)
        } else {
            NativeInt(g)
        };
        for j in 0..2 {
            let x: &mut u64 = &mut ct[2 * i + j][j].values_mut()[index];
            *x = NativeInt(*x).mod_add_fast(g, big_q).value();
        }
    }
}

/// Moves every row to evaluation format and adds a_i * s to its second element.
fn finalize(ct: &mut RingGSWCiphertext, mut a: Vec<NativePoly>, sk_ntt: &NativePoly) -> Result<()> {
    for (row, a_i) in ct.iter_mut().zip(a.iter_mut()) {
        row[0].set_format(Format::Evaluation);
        row[1].set_format(Format::Evaluation);
        a_i.set_format(Format::Evaluation);
        row[1].mul_add_inplace(a_i, sk_ntt)?;
    }
    Ok(())
}

/// Encrypts the monomial X^(m * 2N/q) under the ring secret `sk_ntt`
/// (evaluation format). m is taken modulo q; exponents in [N, 2N) are
/// folded back with X^N = -1.
pub fn encrypt_ap(
    params: &RingGSWParams,
    sk_ntt: &NativePoly,
    m: i64,
    source: &mut Source,
) -> Result<RingGSWCiphertext> {
    let q: i64 = params.lwe().q as i64;
    let big_n: usize = params.lwe().big_n;
    let factor: usize = 2 * big_n / q as usize;

    let mut mm: usize = (((m % q) + q) % q) as usize * factor;
    let negate: bool = mm >= big_n;
    if negate {
        mm -= big_n;
    }

    let (mut ct, a) = sample_rows(params, source);
    add_gadget(params, &mut ct, mm, negate);
    finalize(&mut ct, a, sk_ntt)?;
    Ok(ct)
}

/// Encrypts the bit m (a constant polynomial) under `sk_ntt`.
pub fn encrypt_ginx(
    params: &RingGSWParams,
    sk_ntt: &NativePoly,
    m: u64,
    source: &mut Source,
) -> Result<RingGSWCiphertext> {
    let (mut ct, a) = sample_rows(params, source);
    if m != 0 {
        add_gadget(params, &mut ct, 0, false);
    }
    finalize(&mut ct, a, sk_ntt)?;
    Ok(ct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BinFHEMethod, BinFHEParamSet};

    /// Phase of the second row pair, (row[1] - row[0] * s) for row 1,
    /// which equals e + m * baseG^0 in coefficient format.
    fn phase(ct: &RingGSWCiphertext, row: usize, sk_ntt: &NativePoly) -> NativePoly {
        let mut p: NativePoly = ct[row][1].clone();
        let mut a_s: NativePoly = ct[row][0].clone();
        a_s.mul_inplace(sk_ntt).unwrap();
        p.sub_inplace(&a_s).unwrap();
        p.set_format(Format::Coefficient);
        p
    }

    #[test]
    fn ap_monomial_position_and_sign() {
        let params: RingGSWParams = BinFHEParamSet::Toy.ring_gsw_params(BinFHEMethod::AP).unwrap();
        let ring: &Arc<Ring<u64>> = params.ring();
        let big_q: u64 = params.lwe().big_q;
        let mut source: Source = Source::new([5u8; 32]);
        let sk_ntt: NativePoly = NativePoly::from_ternary(ring, &mut source, Format::Evaluation);

        // q = 256, N = 512: m = 3 sits at X^12, m = -3 = 253 at X^1012 = -X^500.
        for (m, index, negative) in [(3i64, 12usize, false), (-3, 500, true), (0, 0, false)] {
            let ct: RingGSWCiphertext = encrypt_ap(&params, &sk_ntt, m, &mut source).unwrap();
            assert_eq!(ct.rows(), params.digits_g2());
            let p: NativePoly = phase(&ct, 1, &sk_ntt);
            let signed: i64 = NativeInt(p.values()[index]).to_signed_centered(NativeInt(big_q));
            let expected: i64 = if negative { -1 } else { 1 };
            assert!((signed - expected).abs() < 40, "m={m}: {signed}");
        }
    }

    #[test]
    fn ginx_bit_in_constant_term() {
        let params: RingGSWParams =
            BinFHEParamSet::Toy.ring_gsw_params(BinFHEMethod::GINX).unwrap();
        let ring: &Arc<Ring<u64>> = params.ring();
        let big_q: NativeInt = NativeInt(params.lwe().big_q);
        let mut source: Source = Source::new([6u8; 32]);
        let sk_ntt: NativePoly = NativePoly::from_ternary(ring, &mut source, Format::Evaluation);

        let g: i64 = params.base_g() as i64;
        for m in [0u64, 1] {
            let ct: RingGSWCiphertext = encrypt_ginx(&params, &sk_ntt, m, &mut source).unwrap();
            // Row 3 carries baseG^1 on its second element.
            let p: NativePoly = phase(&ct, 3, &sk_ntt);
            let signed: i64 = NativeInt(p.values()[0]).to_signed_centered(big_q);
            assert!((signed - m as i64 * g).abs() < 40, "m={m}: {signed}");
        }
    }
}

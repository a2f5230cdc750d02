use math::poly::{Format, NativePoly};

use crate::params::RingGSWParams;

/// Signed base-baseG decomposition of the two elements of `input`, given in
/// coefficient format. Coefficients are centered (values >= Q/2 become
/// value - Q), then each is split into `digits_g` digits in
/// [-baseG/2, baseG/2), stored modulo Q. Digit l of input[j] lands in
/// output[2l + j], in coefficient format.
pub fn signed_digit_decompose(
    params: &RingGSWParams,
    input: &[NativePoly; 2],
    output: &mut [NativePoly],
) {
    let big_q: u64 = params.lwe().big_q;
    let q_half: u64 = big_q >> 1;
    let g_bits: u32 = params.base_g().trailing_zeros();
    let g_bits_max: u32 = i64::BITS - g_bits;
    let digits_g: usize = params.digits_g();

    debug_assert!(
        output.len() == params.digits_g2(),
        "output.len()={} != digits_g2={}",
        output.len(),
        params.digits_g2()
    );
    debug_assert!(input.iter().all(|p| p.format() == Format::Coefficient));

    for (j, poly) in input.iter().enumerate() {
        for (k, &v) in poly.values().iter().enumerate() {
            let mut d: i64 = if v < q_half {
                v as i64
            } else {
                v as i64 - big_q as i64
            };
            for l in 0..digits_g {
                let r: i64 = (d << g_bits_max) >> g_bits_max;
                d = (d - r) >> g_bits;
                output[j + 2 * l].values_mut()[k] = if r < 0 {
                    (r + big_q as i64) as u64
                } else {
                    r as u64
                };
            }
        }
    }

    output.iter_mut().for_each(|p| {
        p.overwrite_as(Format::Coefficient);
    });
}

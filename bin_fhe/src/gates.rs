use std::sync::Arc;

use math::modulus::native::NativeInt;
use math::poly::{Format, NativePoly};
use tracing::trace;

use crate::error::{BinFHEError, Result};
use crate::lwe::ciphertext::LWECiphertext;
use crate::lwe::scheme::LWEScheme;
use crate::params::{LWEParams, RingGSWParams};
use crate::rgsw::accumulator::Accumulator;
use crate::rgsw::key::{BootstrappingKey, RingGSWEvalKey};

/// Bootstrapped binary gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinGate {
    Or = 0,
    And = 1,
    Nor = 2,
    Nand = 3,
    Xor = 4,
    Xnor = 5,
}

impl BinGate {
    pub const ALL: [BinGate; 6] = [
        BinGate::Or,
        BinGate::And,
        BinGate::Nor,
        BinGate::Nand,
        BinGate::Xor,
        BinGate::Xnor,
    ];

    /// Start q1 of the window [q1, q1 + q/2) of combined phases the gate maps to 0.
    pub fn constant(&self, q: u64) -> u64 {
        let q8: u64 = q >> 3;
        match self {
            BinGate::Or | BinGate::Xor => 5 * q8,
            BinGate::And => 7 * q8,
            BinGate::Nor | BinGate::Xnor => q8,
            BinGate::Nand => 3 * q8,
        }
    }

    /// Plaintext truth table.
    pub fn eval(&self, m1: bool, m2: bool) -> bool {
        match self {
            BinGate::Or => m1 | m2,
            BinGate::And => m1 & m2,
            BinGate::Nor => !(m1 | m2),
            BinGate::Nand => !(m1 & m2),
            BinGate::Xor => m1 ^ m2,
            BinGate::Xnor => !(m1 ^ m2),
        }
    }
}

/// Test polynomial of the gate for the combined body b: coefficient
/// j * 2N/q (j < q/2) is -Q8 if b - j falls in [q1, q1 + q/2) and Q8
/// otherwise, with Q8 = Q/8 + 1.
fn test_vector(params: &RingGSWParams, gate: BinGate, b: u64) -> Result<NativePoly> {
    let q: NativeInt = NativeInt(params.lwe().q);
    let big_q: u64 = params.lwe().big_q;
    let big_n: usize = params.lwe().big_n;
    let factor: usize = 2 * big_n / q.value() as usize;

    let q1: NativeInt = NativeInt(params.gate_const(gate));
    let q2: NativeInt = q1.mod_add_fast(NativeInt(q.value() >> 1), q);
    let q8: u64 = params.q8();
    let q8_neg: u64 = big_q - q8;

    let mut m: Vec<u64> = vec![0u64; big_n];
    for j in 0..(q.value() >> 1) {
        let temp: NativeInt = NativeInt(b).mod_sub_fast(NativeInt(j), q);
        m[j as usize * factor] = if q1 < q2 {
            if temp >= q1 && temp < q2 {
                q8_neg
            } else {
                q8
            }
        } else if temp >= q2 && temp < q1 {
            q8
        } else {
            q8_neg
        };
    }

    let mut tv: NativePoly = NativePoly::from_values(params.ring(), &m, Format::Coefficient)?;
    tv.set_format(Format::Evaluation);
    Ok(tv)
}

/// Evaluates gate on two ciphertexts modulo q and returns a bootstrapped
/// ciphertext of the result modulo q. The inputs must be distinct objects.
pub fn eval_bin_gate(
    params: &RingGSWParams,
    gate: BinGate,
    ek: &RingGSWEvalKey,
    ct1: &LWECiphertext,
    ct2: &LWECiphertext,
    lwe: &LWEScheme,
) -> Result<LWECiphertext> {
    if std::ptr::eq(ct1, ct2) {
        return Err(BinFHEError::Config(
            "gate inputs are the same ciphertext; use a copy or eval_not".into(),
        ));
    }
    let lwe_params: &Arc<LWEParams> = params.lwe();
    let q: u64 = lwe_params.q;
    let big_q: NativeInt = NativeInt(lwe_params.big_q);
    debug_assert!(ct1.modulus() == q && ct2.modulus() == q);
    debug_assert!(
        ek.bs_key().method() == params.method(),
        "key method {:?} != parameters method {:?}",
        ek.bs_key().method(),
        params.method()
    );

    let combined: LWECiphertext = match gate {
        BinGate::Xor | BinGate::Xnor => ct1.sub(ct2).double(),
        _ => ct1.add(ct2),
    };
    trace!(?gate, b = combined.b(), "evaluating gate");

    let mut acc: Accumulator = Accumulator::new(params, test_vector(params, gate, combined.b())?);
    match ek.bs_key() {
        BootstrappingKey::AP(grid) => {
            let base_r: u64 = params.base_r();
            for (i, &a_i) in combined.a().iter().enumerate() {
                let mut digits: u64 = (q - a_i) % q;
                for k in 0..params.digits_r().len() {
                    let a0: u64 = digits % base_r;
                    digits /= base_r;
                    if a0 != 0 {
                        acc.add_to_acc_ap(params, &grid[i][a0 as usize][k])?;
                    }
                }
            }
        }
        BootstrappingKey::GINX(grid) => {
            for (i, &a_i) in combined.a().iter().enumerate() {
                acc.add_to_acc_ginx(params, &grid[0][0][i], (q - a_i) % q)?;
                acc.add_to_acc_ginx(params, &grid[0][1][i], a_i)?;
            }
        }
    }

    // The accumulator encrypts under the ring secret s, so its LWE mask is
    // the coefficient vector of a(X^-1).
    let [a, mut b] = acc.into_inner();
    let mut a: NativePoly = a.transpose()?;
    a.set_format(Format::Coefficient);
    b.set_format(Format::Coefficient);
    let b_new: NativeInt = NativeInt(params.q8()).mod_add_fast(NativeInt(b.values()[0]), big_q);
    let extracted: LWECiphertext =
        LWECiphertext::new(a.values().to_vec(), b_new.value(), big_q.value());

    let switched: LWECiphertext = lwe.key_switch(ek.ks_key(), &extracted);
    let out: LWECiphertext = lwe.mod_switch(q, &switched);
    trace!(?gate, "gate bootstrapped");
    Ok(out)
}

/// Homomorphic negation: (q - a, q/4 - b). Needs no key.
pub fn eval_not(params: &RingGSWParams, ct: &LWECiphertext) -> LWECiphertext {
    let q: NativeInt = NativeInt(params.lwe().q);
    debug_assert!(ct.modulus() == q.value());
    let a: Vec<u64> = ct
        .a()
        .iter()
        .map(|&x| NativeInt(0).mod_sub_fast(NativeInt(x), q).value())
        .collect();
    let b: u64 = NativeInt(q.value() >> 2).mod_sub_fast(NativeInt(ct.b()), q).value();
    LWECiphertext::new(a, b, q.value())
}

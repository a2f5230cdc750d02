use std::sync::Arc;

use math::modulus::impl_u64::generation::first_prime;
use math::modulus::impl_u64::prime::PRIME_MAX_BITS;
use math::modulus::native::NativeInt;
use math::modulus::prime::Prime;
use math::poly::{Format, NativePoly};
use math::ring::Ring;
use sampling::distributions::DiscreteGaussian;
use tracing::debug;

use crate::error::{BinFHEError, Result};
use crate::gates::BinGate;

/// Largest accepted lattice and ring dimension. The monomial table alone
/// holds 2N polynomials of degree N.
pub const MAX_RING_DIMENSION: usize = 1 << 12;

/// Blind rotation flavour of the accumulator.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinFHEMethod {
    /// Alperin-Sheriff & Peikert: one RGSW key per (coordinate, digit value, digit position).
    AP,
    /// Gama-Izabachene-Nguyen-Xie: two RGSW keys per coordinate, ternary secrets only.
    GINX,
}

impl BinFHEMethod {
    pub(crate) fn tag(&self) -> u8 {
        match self {
            BinFHEMethod::AP => 0,
            BinFHEMethod::GINX => 1,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(BinFHEMethod::AP),
            1 => Ok(BinFHEMethod::GINX),
            _ => Err(BinFHEError::InvalidData(format!(
                "unknown bootstrapping method tag {tag}"
            ))),
        }
    }
}

/// Named parameter presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinFHEParamSet {
    /// Insecure, for tests and examples.
    Toy,
    /// Intermediate security, faster than [BinFHEParamSet::Std128].
    Medium,
    /// 128-bit security tuned for [BinFHEMethod::AP].
    Std128AP,
    /// 128-bit security tuned for [BinFHEMethod::GINX].
    Std128,
}

/// Primary values of a preset; everything else is derived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSetDescriptor {
    /// Q is the first NTT-friendly prime above 2^q_bits.
    pub q_bits: u64,
    pub big_n: usize,
    pub n: usize,
    pub q: u64,
    pub sigma: f64,
    pub base_ks: u64,
    pub base_g: u64,
    pub base_r: u64,
}

impl BinFHEParamSet {
    pub fn descriptor(&self) -> ParamSetDescriptor {
        match self {
            BinFHEParamSet::Toy => ParamSetDescriptor {
                q_bits: 31,
                big_n: 512,
                n: 64,
                q: 256,
                sigma: 3.19,
                base_ks: 25,
                base_g: 1 << 11,
                base_r: 23,
            },
            BinFHEParamSet::Medium => ParamSetDescriptor {
                q_bits: 28,
                big_n: 1024,
                n: 422,
                q: 1024,
                sigma: 3.19,
                base_ks: 32,
                base_g: 1 << 10,
                base_r: 32,
            },
            BinFHEParamSet::Std128AP => ParamSetDescriptor {
                q_bits: 27,
                big_n: 1024,
                n: 512,
                q: 1024,
                sigma: 3.19,
                base_ks: 25,
                base_g: 1 << 9,
                base_r: 32,
            },
            BinFHEParamSet::Std128 => ParamSetDescriptor {
                q_bits: 27,
                big_n: 1024,
                n: 512,
                q: 1024,
                sigma: 3.19,
                base_ks: 25,
                base_g: 1 << 7,
                base_r: 32,
            },
        }
    }

    pub fn lwe_params(&self) -> Result<LWEParams> {
        let d: ParamSetDescriptor = self.descriptor();
        let prime: Prime<u64> = first_prime(d.q_bits, 2 * d.big_n as u64)?;
        LWEParams::new(d.n, d.big_n, d.q, prime.q(), d.sigma, d.base_ks)
    }

    pub fn ring_gsw_params(&self, method: BinFHEMethod) -> Result<RingGSWParams> {
        let d: ParamSetDescriptor = self.descriptor();
        RingGSWParams::new(Arc::new(self.lwe_params()?), d.base_g, d.base_r, method)
    }
}

/// Smallest k such that base^k >= modulus.
pub(crate) fn digit_count(base: u64, modulus: u64) -> usize {
    let mut k: usize = 0;
    let mut acc: u128 = 1;
    while acc < modulus as u128 {
        acc *= base as u128;
        k += 1;
    }
    k
}

/// Parameters of the LWE layer: dimensions n (input/output of gates) and
/// N (extracted from the ring), moduli q and Q, noise and key-switching base.
#[derive(Clone, Debug)]
pub struct LWEParams {
    pub n: usize,
    pub big_n: usize,
    pub q: u64,
    pub big_q: u64,
    pub sigma: f64,
    pub base_ks: u64,
    digits_ks: Vec<u64>,
    q_mu: u128,
    big_q_mu: u128,
    dgg: DiscreteGaussian,
}

impl LWEParams {
    pub fn new(
        n: usize,
        big_n: usize,
        q: u64,
        big_q: u64,
        sigma: f64,
        base_ks: u64,
    ) -> Result<Self> {
        if n == 0 || n > MAX_RING_DIMENSION {
            return Err(BinFHEError::Config(format!(
                "lattice dimension n={n} must be in [1, {MAX_RING_DIMENSION}]"
            )));
        }
        if !big_n.is_power_of_two() || big_n < 2 {
            return Err(BinFHEError::Config(format!(
                "ring dimension N={big_n} must be a power of two"
            )));
        }
        if big_n > MAX_RING_DIMENSION {
            return Err(BinFHEError::Config(format!(
                "ring dimension N={big_n} exceeds {MAX_RING_DIMENSION}"
            )));
        }
        if !q.is_power_of_two() || q < 8 || q > 2 * big_n as u64 {
            return Err(BinFHEError::Config(format!(
                "q={q} must be a power of two in [8, 2N={}]",
                2 * big_n
            )));
        }
        if NativeInt(big_q).msb() > PRIME_MAX_BITS {
            return Err(BinFHEError::Config(format!(
                "Q={big_q} exceeds {PRIME_MAX_BITS} bits"
            )));
        }
        if big_q % (2 * big_n as u64) != 1 {
            return Err(BinFHEError::Config(format!(
                "Q={big_q} is not 1 mod 2N={}",
                2 * big_n
            )));
        }
        if base_ks < 2 {
            return Err(BinFHEError::Config(format!(
                "key-switching base {base_ks} must be at least 2"
            )));
        }
        let dgg: DiscreteGaussian = DiscreteGaussian::new(sigma)
            .map_err(|e| BinFHEError::Config(format!("invalid sigma {sigma}: {e}")))?;

        let count: usize = digit_count(base_ks, big_q);
        let mut digits_ks: Vec<u64> = Vec::with_capacity(count);
        let mut power: u64 = 1;
        for _ in 0..count {
            digits_ks.push(power);
            power = power.wrapping_mul(base_ks);
        }

        Ok(Self {
            n,
            big_n,
            q,
            big_q,
            sigma,
            base_ks,
            digits_ks,
            q_mu: NativeInt(q).compute_mu()?,
            big_q_mu: NativeInt(big_q).compute_mu()?,
            dgg,
        })
    }

    /// Powers baseKS^k for k < ceil(log_baseKS(Q)).
    pub fn digits_ks(&self) -> &[u64] {
        &self.digits_ks
    }

    /// Barrett constant of `modulus`, which must be q or Q.
    pub fn mu(&self, modulus: u64) -> u128 {
        debug_assert!(
            modulus == self.q || modulus == self.big_q,
            "no Barrett constant for modulus {modulus}"
        );
        if modulus == self.big_q {
            self.big_q_mu
        } else {
            self.q_mu
        }
    }

    pub fn dgg(&self) -> &DiscreteGaussian {
        &self.dgg
    }
}

/// Parameters of the RingGSW accumulator together with the tables derived
/// from them. Only `lwe`, `base_g`, `base_r` and `method` are primary; the
/// rest is rebuilt by [RingGSWParams::pre_compute]. The inverse of
/// v, the vGprime gadget and the MSB test polynomial are not built: AP and
/// GINX accumulation never read them.
#[derive(Clone, Debug)]
pub struct RingGSWParams {
    lwe: Arc<LWEParams>,
    base_g: u64,
    base_r: u64,
    method: BinFHEMethod,
    ring: Arc<Ring<u64>>,
    digits_g: usize,
    digits_g2: usize,
    g_power: Vec<u64>,
    digits_r: Vec<u64>,
    q8: u64,
    gate_const: [u64; 6],
    monomials: Vec<NativePoly>,
}

impl RingGSWParams {
    pub fn new(
        lwe: Arc<LWEParams>,
        base_g: u64,
        base_r: u64,
        method: BinFHEMethod,
    ) -> Result<Self> {
        if !base_g.is_power_of_two() || base_g < 2 {
            return Err(BinFHEError::Config(format!(
                "gadget base {base_g} is not a power of two"
            )));
        }
        if base_r < 2 {
            return Err(BinFHEError::Config(format!(
                "refreshing base {base_r} must be at least 2"
            )));
        }
        let ring: Ring<u64> = Ring::new(lwe.big_n, lwe.big_q)?;
        let mut params: RingGSWParams = Self {
            lwe,
            base_g,
            base_r,
            method,
            ring: Arc::new(ring),
            digits_g: 0,
            digits_g2: 0,
            g_power: Vec::new(),
            digits_r: Vec::new(),
            q8: 0,
            gate_const: [0; 6],
            monomials: Vec::new(),
        };
        params.pre_compute()?;
        Ok(params)
    }

    /// Rebuilds every derived table from the primary fields.
    pub fn pre_compute(&mut self) -> Result<()> {
        let big_q: u64 = self.lwe.big_q;
        let q: u64 = self.lwe.q;
        let big_n: usize = self.lwe.big_n;

        if self.ring.n() != big_n || self.ring.q() != big_q {
            self.ring = Arc::new(Ring::new(big_n, big_q)?);
        }

        self.digits_g = digit_count(self.base_g, big_q);
        self.digits_g2 = self.digits_g << 1;

        self.g_power = Vec::with_capacity(self.digits_g);
        let mut power: NativeInt = NativeInt(1);
        for _ in 0..self.digits_g {
            self.g_power.push(power.value());
            power = power.mod_mul(NativeInt(self.base_g), NativeInt(big_q));
        }

        let digits_r: usize = digit_count(self.base_r, q);
        self.digits_r = Vec::with_capacity(digits_r);
        let mut power: u64 = 1;
        for _ in 0..digits_r {
            self.digits_r.push(power);
            power = power.wrapping_mul(self.base_r);
        }

        self.q8 = big_q / 8 + 1;

        for gate in BinGate::ALL {
            self.gate_const[gate as usize] = gate.constant(q);
        }

        self.monomials = match self.method {
            BinFHEMethod::GINX => self.build_monomials()?,
            BinFHEMethod::AP => Vec::new(),
        };

        debug!(
            n = self.lwe.n,
            big_n,
            q,
            big_q,
            digits_g = self.digits_g,
            digits_r = self.digits_r.len(),
            method = ?self.method,
            "ring-gsw parameters ready"
        );
        Ok(())
    }

    /// X^m - 1 in [Format::Evaluation] for m in [0, 2N), reduced with X^N = -1.
    fn build_monomials(&self) -> Result<Vec<NativePoly>> {
        let big_n: usize = self.lwe.big_n;
        let big_q: u64 = self.lwe.big_q;
        let mut monomials: Vec<NativePoly> = Vec::with_capacity(2 * big_n);
        let mut values: Vec<u64> = vec![0u64; big_n];
        for m in 0..2 * big_n {
            values.iter_mut().for_each(|x| *x = 0);
            values[0] = big_q - 1;
            if m < big_n {
                values[m] = NativeInt(values[m])
                    .mod_add_fast(NativeInt(1), NativeInt(big_q))
                    .value();
            } else {
                values[m - big_n] = NativeInt(values[m - big_n])
                    .mod_sub_fast(NativeInt(1), NativeInt(big_q))
                    .value();
            }
            let mut poly: NativePoly =
                NativePoly::from_values(&self.ring, &values, Format::Coefficient)?;
            poly.set_format(Format::Evaluation);
            monomials.push(poly);
        }
        Ok(monomials)
    }

    pub fn lwe(&self) -> &Arc<LWEParams> {
        &self.lwe
    }

    pub fn base_g(&self) -> u64 {
        self.base_g
    }

    pub fn base_r(&self) -> u64 {
        self.base_r
    }

    pub fn method(&self) -> BinFHEMethod {
        self.method
    }

    pub fn ring(&self) -> &Arc<Ring<u64>> {
        &self.ring
    }

    /// ceil(log_baseG(Q)).
    pub fn digits_g(&self) -> usize {
        self.digits_g
    }

    /// Number of rows of a RingGSW ciphertext, 2 * digits_g.
    pub fn digits_g2(&self) -> usize {
        self.digits_g2
    }

    /// baseG^i mod Q for i < digits_g.
    pub fn g_power(&self) -> &[u64] {
        &self.g_power
    }

    /// baseR^k for k < ceil(log_baseR(q)).
    pub fn digits_r(&self) -> &[u64] {
        &self.digits_r
    }

    /// Q/8 + 1, the amplitude of the test polynomial.
    pub fn q8(&self) -> u64 {
        self.q8
    }

    pub fn gate_const(&self, gate: BinGate) -> u64 {
        self.gate_const[gate as usize]
    }

    /// X^m - 1 in evaluation format, available for [BinFHEMethod::GINX] only.
    pub fn monomial(&self, m: usize) -> &NativePoly {
        debug_assert!(
            !self.monomials.is_empty(),
            "monomials are only precomputed for GINX"
        );
        &self.monomials[m]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toy_derived_values() {
        let params: RingGSWParams = BinFHEParamSet::Toy
            .ring_gsw_params(BinFHEMethod::GINX)
            .unwrap();
        assert_eq!(params.lwe().big_q, 2147493889);
        assert_eq!(params.digits_g(), 3);
        assert_eq!(params.digits_g2(), 6);
        assert_eq!(params.digits_r(), &[1, 23]);
        assert_eq!(params.g_power()[2], (1u64 << 22) % params.lwe().big_q);
        assert_eq!(params.q8(), 2147493889 / 8 + 1);
        assert_eq!(params.gate_const(BinGate::And), 7 * 32);
        assert_eq!(params.gate_const(BinGate::Xnor), 32);
        assert_eq!(params.lwe().digits_ks().len(), 7);
    }

    #[test]
    fn rejects_non_power_of_two_gadget_base() {
        let lwe: Arc<LWEParams> = Arc::new(BinFHEParamSet::Toy.lwe_params().unwrap());
        match RingGSWParams::new(lwe, 1000, 23, BinFHEMethod::AP) {
            Err(BinFHEError::Config(_)) => {}
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_inconsistent_lwe_params() {
        assert!(matches!(
            LWEParams::new(64, 512, 3000, 2147493889, 3.19, 25),
            Err(BinFHEError::Config(_))
        ));
        assert!(matches!(
            LWEParams::new(64, 512, 256, 2147493891, 3.19, 25),
            Err(BinFHEError::Config(_))
        ));
    }

    #[test]
    fn rejects_oversized_dimensions() {
        let big_n: usize = 2 * MAX_RING_DIMENSION;
        let prime: Prime<u64> = first_prime(27, 2 * big_n as u64).unwrap();
        match LWEParams::new(64, big_n, 512, prime.q(), 3.19, 25) {
            Err(BinFHEError::Config(msg)) => assert!(msg.contains("exceeds")),
            other => panic!("expected config error, got {other:?}"),
        }
        assert!(matches!(
            LWEParams::new(MAX_RING_DIMENSION + 1, 1024, 512, 134215681, 3.19, 25),
            Err(BinFHEError::Config(_))
        ));
    }

    #[test]
    fn monomials_match_definition() {
        let params: RingGSWParams = BinFHEParamSet::Toy
            .ring_gsw_params(BinFHEMethod::GINX)
            .unwrap();
        let big_q: u64 = params.lwe().big_q;
        let big_n: usize = params.lwe().big_n;

        let mut zero: NativePoly = params.monomial(0).clone();
        zero.set_format(Format::Coefficient);
        assert!(zero.values().iter().all(|&x| x == 0));

        let mut m: NativePoly = params.monomial(big_n + 3).clone();
        m.set_format(Format::Coefficient);
        assert_eq!(m.values()[0], big_q - 1);
        assert_eq!(m.values()[3], big_q - 1);
        assert_eq!(m.values().iter().filter(|&&x| x != 0).count(), 2);

        let mut m: NativePoly = params.monomial(big_n).clone();
        m.set_format(Format::Coefficient);
        assert_eq!(m.values()[0], big_q - 2);
    }
}

use rand_distr::{Distribution as _, Normal, NormalError};

use crate::source::Source;

/// Small integer distributions for secrets and errors.
#[derive(Clone, Copy, Debug)]
pub enum Distribution {
    /// Rounded normal of standard deviation `sigma`, rejected outside `[-bound, bound]`.
    Gaussian(DiscreteGaussian),
    /// Uniform over {-1, 0, 1}.
    Ternary,
}

impl Distribution {
    #[inline(always)]
    pub fn sample_i64(&self, source: &mut Source) -> i64 {
        match self {
            Distribution::Gaussian(g) => g.sample_i64(source),
            Distribution::Ternary => source.next_u64n(3, 3) as i64 - 1,
        }
    }

    /// Returns a sample mapped into [0, q).
    #[inline(always)]
    pub fn sample_mod(&self, source: &mut Source, q: u64) -> u64 {
        reduce_signed(self.sample_i64(source), q)
    }
}

#[inline(always)]
fn reduce_signed(x: i64, q: u64) -> u64 {
    let r: u64 = x.unsigned_abs() % q;
    if x < 0 && r != 0 {
        q - r
    } else {
        r
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DiscreteGaussian {
    normal: Normal<f64>,
    sigma: f64,
    bound: f64,
}

impl DiscreteGaussian {
    /// Tail cut applied when no explicit bound is given, in multiples of sigma.
    pub const DEFAULT_TAIL: f64 = 6.0;

    pub fn new(sigma: f64) -> Result<Self, NormalError> {
        Self::with_bound(sigma, sigma * Self::DEFAULT_TAIL)
    }

    pub fn with_bound(sigma: f64, bound: f64) -> Result<Self, NormalError> {
        Ok(Self {
            normal: Normal::new(0.0, sigma)?,
            sigma,
            bound,
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn bound(&self) -> f64 {
        self.bound
    }

    #[inline(always)]
    pub fn sample_i64(&self, source: &mut Source) -> i64 {
        let mut x: f64 = self.normal.sample(source);
        while x.abs() > self.bound {
            x = self.normal.sample(source);
        }
        x.round() as i64
    }

    /// Returns a sample mapped into [0, q).
    #[inline(always)]
    pub fn sample_mod(&self, source: &mut Source, q: u64) -> u64 {
        reduce_signed(self.sample_i64(source), q)
    }
}

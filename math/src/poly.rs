pub mod native;

pub use native::NativePoly;

/// Representation of a ring element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// Coefficients of the polynomial, in natural order.
    Coefficient,
    /// Evaluations at the primitive 2n-th roots of unity, in bit-reversed order.
    Evaluation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly<O>(pub Vec<O>);

impl<O> Poly<O>
where
    O: Default + Clone + Copy,
{
    pub fn new(n: usize) -> Self {
        Self(vec![O::default(); n])
    }

    pub fn n(&self) -> usize {
        self.0.len()
    }

    pub fn set_all(&mut self, v: &O) {
        self.0.fill(*v)
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }
}

use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::shoup::ShoupPrecomp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prime<O> {
    pub q: O,
    /// 2q
    pub two_q: O,
    /// 4q
    pub four_q: O,
    /// Euler's totient q-1.
    pub phi: O,
    /// Distinct prime factors of q-1.
    pub factors: Vec<O>,
    pub barrett: BarrettPrecomp<O>,
    pub shoup: ShoupPrecomp<O>,
}

pub mod impl_u64;

use crate::automorphism::AutoPermMap;
use crate::dft::DFT;
use crate::modulus::prime::Prime;
use crate::modulus::WordOps;
use crate::poly::Poly;

/// Precomputations for Z_q[X]/(X^n+1): modulus, NTT tables and cached
/// automorphism permutations. Built once per parameter set and shared
/// by reference among all its polynomials.
pub struct Ring<O> {
    pub n: usize,
    pub modulus: Prime<O>,
    pub dft: Box<dyn DFT<O>>,
    pub auto_perms: AutoPermMap,
}

impl<O> Ring<O> {
    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn cyclotomic_order(&self) -> usize {
        self.n << 1
    }
}

impl Ring<u64> {
    pub fn q(&self) -> u64 {
        self.modulus.q
    }

    pub fn new_poly(&self) -> Poly<u64> {
        Poly::<u64>::new(self.n())
    }
}

impl<O> std::fmt::Debug for Ring<O>
where
    O: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ring")
            .field("n", &self.n)
            .field("q", &self.modulus.q)
            .finish()
    }
}

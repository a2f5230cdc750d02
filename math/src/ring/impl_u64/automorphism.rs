use crate::automorphism::AutoPerm;
use crate::error::MathError;
use crate::poly::Poly;
use crate::ring::Ring;

impl Ring<u64> {
    /// Assigns a(X^gal_el) to b. NTT selects the evaluation domain.
    /// Uses the cached tables of gal_el if present.
    pub fn automorphism<const NTT: bool>(
        &self,
        a: &Poly<u64>,
        gal_el: usize,
        b: &mut Poly<u64>,
    ) -> Result<(), MathError> {
        match self.auto_perms.get(&gal_el) {
            Some(perm) => self.automorphism_from_perm::<NTT>(a, perm, b),
            None => self.automorphism_from_perm::<NTT>(a, &AutoPerm::new(self.n, gal_el)?, b),
        }
        Ok(())
    }

    pub fn automorphism_from_perm<const NTT: bool>(
        &self,
        a: &Poly<u64>,
        perm: &AutoPerm,
        b: &mut Poly<u64>,
    ) {
        debug_assert!(
            a.n() == b.n(),
            "invalid inputs: a.n() = {} != b.n() = {}",
            a.n(),
            b.n()
        );
        debug_assert!(
            perm.ntt.len() == a.n(),
            "invalid perm: perm.n() = {} != a.n() = {}",
            perm.ntt.len(),
            a.n()
        );

        let b_vec: &mut Vec<u64> = &mut b.0;
        let a_vec: &Vec<u64> = &a.0;

        if NTT {
            b_vec
                .iter_mut()
                .zip(perm.ntt.iter())
                .for_each(|(bi, idx)| *bi = a_vec[*idx]);
        } else {
            let mask: usize = a.n() - 1;
            let q: u64 = self.modulus.q();
            a_vec.iter().zip(perm.coeff.iter()).for_each(|(ai, idx)| {
                let sign: bool = (idx >> (usize::BITS - 1)) == 1;
                b_vec[idx & mask] = if sign && *ai != 0 { q - ai } else { *ai };
            });
        }
    }
}

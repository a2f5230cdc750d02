use crate::dft::DFT;
use crate::error::MathError;
use crate::modulus::prime::Prime;
use crate::modulus::shoup::Shoup;
use crate::modulus::ReduceOnce;
use crate::modulus::WordOps;
use crate::modulus::ONCE;
use itertools::izip;

/// Negacyclic NTT over Z_q[X]/(X^n+1).
///
/// The forward transform is a Cooley-Tukey decimation in time taking
/// coefficients in natural order to evaluations in bit-reversed order:
/// output j holds a(psi^(2 * brv(j) + 1)). The backward transform is a
/// Gentleman-Sande decimation in frequency and folds the n^-1 scaling
/// into its last layer. Twiddles are Shoup-prepared.
pub struct Table<O> {
    prime: Prime<O>,
    psi: O,
    psi_forward_rev: Vec<Shoup<u64>>,
    psi_backward_rev: Vec<Shoup<u64>>,
    n_inv: Shoup<u64>,
    psi_n_inv: Shoup<u64>,
    q: O,
    two_q: O,
    four_q: O,
}

impl Table<u64> {
    pub fn new(prime: Prime<u64>, nth_root: u64) -> Result<Table<u64>, MathError> {
        if nth_root < 4 || nth_root & (nth_root - 1) != 0 {
            return Err(MathError::InvalidRingDimension((nth_root >> 1) as usize));
        }

        let psi: u64 = prime.primitive_nth_root(nth_root)?;
        let psi_inv: u64 = prime.inv(psi)?;

        let psi_shoup: Shoup<u64> = prime.shoup.prepare(psi);
        let psi_inv_shoup: Shoup<u64> = prime.shoup.prepare(psi_inv);

        let n: usize = (nth_root >> 1) as usize;

        let mut psi_forward_rev: Vec<Shoup<u64>> = vec![Shoup(0, 0); n];
        let mut psi_backward_rev: Vec<Shoup<u64>> = vec![Shoup(0, 0); n];

        psi_forward_rev[0] = prime.shoup.one();
        psi_backward_rev[0] = prime.shoup.one();

        let log_n: u32 = n.log2() as _;

        let mut powers_forward: u64 = 1u64;
        let mut powers_backward: u64 = 1u64;

        for i in 1..n {
            let i_rev: usize = i.reverse_bits_msb(log_n);

            prime
                .shoup
                .mul_external_assign(psi_shoup, &mut powers_forward);
            prime
                .shoup
                .mul_external_assign(psi_inv_shoup, &mut powers_backward);

            psi_forward_rev[i_rev] = prime.shoup.prepare(powers_forward);
            psi_backward_rev[i_rev] = prime.shoup.prepare(powers_backward);
        }

        let n_inv: u64 = prime.inv(n as u64)?;
        let psi_n_inv: u64 = prime
            .shoup
            .mul_external(prime.shoup.prepare(n_inv), psi_backward_rev[1].0);

        let q: u64 = prime.q();

        Ok(Self {
            n_inv: prime.shoup.prepare(n_inv),
            psi_n_inv: prime.shoup.prepare(psi_n_inv),
            prime,
            psi,
            psi_forward_rev,
            psi_backward_rev,
            q,
            two_q: q << 1,
            four_q: q << 2,
        })
    }

    pub fn prime(&self) -> &Prime<u64> {
        &self.prime
    }

    /// Primitive 2n-th root of unity the table is built on.
    pub fn psi(&self) -> u64 {
        self.psi
    }

    pub fn n(&self) -> usize {
        self.psi_forward_rev.len()
    }
}

impl DFT<u64> for Table<u64> {
    fn forward_inplace(&self, a: &mut [u64]) {
        self.forward_inplace::<false>(a)
    }

    fn forward_inplace_lazy(&self, a: &mut [u64]) {
        self.forward_inplace::<true>(a)
    }

    fn backward_inplace(&self, a: &mut [u64]) {
        self.backward_inplace::<false>(a)
    }

    fn backward_inplace_lazy(&self, a: &mut [u64]) {
        self.backward_inplace::<true>(a)
    }
}

impl Table<u64> {
    /// Inputs in [0, 4q); outputs in [0, q), or [0, 2q) if LAZY.
    pub fn forward_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        let n: usize = a.len();
        debug_assert!(
            n == self.n(),
            "invalid a.len()= {} != table n = {}",
            n,
            self.n()
        );
        let log_n: u32 = usize::BITS - (n - 1).leading_zeros();

        for layer in 0..log_n {
            let (m, size) = (1 << layer, 1 << (log_n - layer - 1));
            let t: usize = 2 * size;
            if layer == log_n - 1 {
                izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    self.dit_inplace::<false>(&mut a[0], &mut b[0], *psi);
                    if !LAZY {
                        a[0].reduce_once_assign(self.q);
                        b[0].reduce_once_assign(self.q);
                    }
                    debug_assert!(
                        a[0] < self.two_q && b[0] < self.two_q,
                        "forward_inplace output > 2q-1"
                    );
                });
            } else if size >= 8 {
                izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a.chunks_exact_mut(8), b.chunks_exact_mut(8)).for_each(|(a, b)| {
                        self.dit_inplace::<true>(&mut a[0], &mut b[0], *psi);
                        self.dit_inplace::<true>(&mut a[1], &mut b[1], *psi);
                        self.dit_inplace::<true>(&mut a[2], &mut b[2], *psi);
                        self.dit_inplace::<true>(&mut a[3], &mut b[3], *psi);
                        self.dit_inplace::<true>(&mut a[4], &mut b[4], *psi);
                        self.dit_inplace::<true>(&mut a[5], &mut b[5], *psi);
                        self.dit_inplace::<true>(&mut a[6], &mut b[6], *psi);
                        self.dit_inplace::<true>(&mut a[7], &mut b[7], *psi);
                    });
                });
            } else {
                izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dit_inplace::<true>(a, b, *psi));
                });
            }
        }
    }

    /// Inputs in [0, 4q); outputs in [0, 4q), or [0, 2q) if !LAZY.
    #[inline(always)]
    fn dit_inplace<const LAZY: bool>(&self, a: &mut u64, b: &mut u64, t: Shoup<u64>) {
        debug_assert!(*a < self.four_q, "a:{} 4q:{}", a, self.four_q);
        debug_assert!(*b < self.four_q, "b:{} 4q:{}", b, self.four_q);
        a.reduce_once_assign(self.two_q);
        let bt: u64 = self.prime.shoup.mul_external_lazy(t, *b);
        *b = *a + self.two_q - bt;
        *a += bt;
        if !LAZY {
            a.reduce_once_assign(self.two_q);
            b.reduce_once_assign(self.two_q);
        }
    }

    /// Inputs in [0, 2q); outputs in [0, q), or [0, 2q) if LAZY.
    pub fn backward_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        let n: usize = a.len();
        debug_assert!(
            n == self.n(),
            "invalid a.len()= {} != table n = {}",
            n,
            self.n()
        );
        let log_n: u32 = usize::BITS - (n - 1).leading_zeros();

        for layer in (0..log_n).rev() {
            let (m, size) = (1 << layer, 1 << (log_n - layer - 1));
            let t: usize = 2 * size;
            if layer == 0 {
                let (a, b) = a.split_at_mut(size);
                izip!(a, b).for_each(|(a, b)| self.dif_last_inplace::<LAZY>(a, b));
            } else if size >= 8 {
                izip!(a.chunks_exact_mut(t), &self.psi_backward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a.chunks_exact_mut(8), b.chunks_exact_mut(8)).for_each(|(a, b)| {
                        self.dif_inplace(&mut a[0], &mut b[0], *psi);
                        self.dif_inplace(&mut a[1], &mut b[1], *psi);
                        self.dif_inplace(&mut a[2], &mut b[2], *psi);
                        self.dif_inplace(&mut a[3], &mut b[3], *psi);
                        self.dif_inplace(&mut a[4], &mut b[4], *psi);
                        self.dif_inplace(&mut a[5], &mut b[5], *psi);
                        self.dif_inplace(&mut a[6], &mut b[6], *psi);
                        self.dif_inplace(&mut a[7], &mut b[7], *psi);
                    });
                });
            } else {
                izip!(a.chunks_exact_mut(t), &self.psi_backward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dif_inplace(a, b, *psi));
                });
            }
        }
    }

    /// Inputs and outputs in [0, 2q).
    #[inline(always)]
    fn dif_inplace(&self, a: &mut u64, b: &mut u64, t: Shoup<u64>) {
        debug_assert!(*a < self.two_q, "a:{} 2q:{}", a, self.two_q);
        debug_assert!(*b < self.two_q, "b:{} 2q:{}", b, self.two_q);
        let d: u64 = self
            .prime
            .shoup
            .mul_external_lazy(t, *a + self.two_q - *b);
        *a += *b;
        a.reduce_once_assign(self.two_q);
        *b = d;
    }

    #[inline(always)]
    fn dif_last_inplace<const LAZY: bool>(&self, a: &mut u64, b: &mut u64) {
        debug_assert!(*a < self.two_q);
        debug_assert!(*b < self.two_q);
        let d: u64 = self
            .prime
            .shoup
            .mul_external_lazy(self.psi_n_inv, *a + self.two_q - *b);
        *a = self.prime.shoup.mul_external_lazy(self.n_inv, *a + *b);
        *b = d;
        if !LAZY {
            a.reduce_once_assign(self.q);
            b.reduce_once_assign(self.q);
        }
    }
}

impl Table<u64> {
    /// Reduces lazy outputs in [0, 2q) to [0, q).
    #[inline(always)]
    pub fn reduce_lazy(&self, a: &mut [u64]) {
        a.iter_mut()
            .for_each(|x| self.prime.barrett.reduce_assign::<ONCE>(x));
    }
}

use std::ops::{Index, IndexMut};
use std::sync::Arc;

use math::poly::{Format, NativePoly};
use math::ring::Ring;

/// RingGSW ciphertext: `rows` pairs of ring elements. Row 2i carries the
/// gadget term baseG^i on its first element, row 2i+1 on its second.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingGSWCiphertext {
    rows: Vec<[NativePoly; 2]>,
}

impl RingGSWCiphertext {
    pub fn zero(ring: &Arc<Ring<u64>>, rows: usize, format: Format) -> Self {
        Self {
            rows: (0..rows)
                .map(|_| [NativePoly::zero(ring, format), NativePoly::zero(ring, format)])
                .collect(),
        }
    }

    pub fn from_rows(rows: Vec<[NativePoly; 2]>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[NativePoly; 2]> {
        self.rows.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut [NativePoly; 2]> {
        self.rows.iter_mut()
    }

    pub fn set_format(&mut self, format: Format) {
        self.rows
            .iter_mut()
            .flat_map(|row| row.iter_mut())
            .for_each(|p| p.set_format(format));
    }
}

impl Index<usize> for RingGSWCiphertext {
    type Output = [NativePoly; 2];

    fn index(&self, i: usize) -> &Self::Output {
        &self.rows[i]
    }
}

impl IndexMut<usize> for RingGSWCiphertext {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.rows[i]
    }
}

use thiserror::Error;

use crate::poly::Format;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(&'static str),

    #[error("{value} is not invertible modulo {modulus}")]
    NotInvertible { value: u64, modulus: u64 },

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid modulus {modulus}: {reason}")]
    InvalidModulus { modulus: u64, reason: &'static str },

    #[error("invalid galois element {gal_el}: must be odd and < {nth_root}")]
    InvalidGaloisElement { gal_el: usize, nth_root: usize },

    #[error("invalid ring dimension {0}: must be a power of two")]
    InvalidRingDimension(usize),

    #[error("format mismatch: {lhs:?} != {rhs:?}")]
    FormatMismatch { lhs: Format, rhs: Format },

    #[error("operation requires {expected:?} format, got {got:?}")]
    InvalidFormat { expected: Format, got: Format },

    #[error("ring mismatch: elements belong to different rings")]
    RingMismatch,

    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },
}

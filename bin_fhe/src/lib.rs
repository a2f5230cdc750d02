//! FHEW-style bootstrapped Boolean gates over LWE ciphertexts.
//!
//! Each gate combines two LWE ciphertexts, blind-rotates a test
//! polynomial encoding the gate's truth table through a RingGSW
//! accumulator (AP or GINX), and returns a fresh LWE ciphertext after
//! extraction, key switching and modulus switching.

pub mod context;
pub mod error;
pub mod gates;
pub mod lwe;
pub mod params;
pub mod rgsw;
pub mod serialization;

pub use context::BinFHEContext;
pub use error::{BinFHEError, Result};
pub use gates::BinGate;
pub use params::{BinFHEMethod, BinFHEParamSet, LWEParams, RingGSWParams};

//! RingGSW layer: ciphertexts, gadget decomposition, encryption of
//! monomials, the blind-rotation accumulator and bootstrapping keys.

pub mod accumulator;
pub mod ciphertext;
pub mod decomposition;
pub mod encryption;
pub mod key;
pub mod keygen;

pub use accumulator::Accumulator;
pub use ciphertext::RingGSWCiphertext;
pub use key::{BootstrappingKey, RingGSWEvalKey};

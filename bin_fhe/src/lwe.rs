//! LWE layer: ciphertexts, keys and the encryption scheme used at both
//! ends of a bootstrapped gate.

pub mod ciphertext;
pub mod keys;
pub mod scheme;

pub use ciphertext::{LWECiphertext, LWEPlaintext};
pub use keys::{LWESecretKey, LWESwitchingKey};
pub use scheme::LWEScheme;

pub mod automorphism;
pub mod ring;
pub mod sampling;

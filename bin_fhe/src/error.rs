use math::MathError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BinFHEError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Math(#[from] MathError),

    #[error("unsupported serialization version {found} (supported up to {supported})")]
    Version { found: u32, supported: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, BinFHEError>;

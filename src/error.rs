//! Crate error type.
//!
//! Every detected contract violation is terminal for the operation that hit it;
//! there is no retry or partial recovery anywhere in the crate. High-level APIs
//! surface these as `Result`, low-level hot-path functions treat shape misuse as
//! programmer error and panic (see the crate docs).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A training or builder parameter is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Supplied data does not form a valid matrix or does not match the model.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A matrix/buffer dimension disagrees with what the operation requires.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: String,
        actual: String,
    },

    /// A persisted weight file disagrees with the live network.
    #[error("weight file mismatch: {0}")]
    WeightMismatch(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

//! Error kinds surfaced by training, model I/O and configuration.
//!
//! The correction hot path (`Corrector::correct`) never returns an error —
//! every internal failure mode degrades to "return the original token" per
//! the propagation policy. These kinds are only raised by `train`, `save`,
//! `load` and `Config` validation.

use thiserror::Error;

/// Errors raised outside the correction hot path.
#[derive(Debug, Error)]
pub enum CorrectorError {
    /// Any source/sink failure during training, loading, or saving.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed `word freq` line in a frequency dictionary.
    #[error("invalid dictionary entry on line {line}: {text:?}")]
    InvalidDictEntry { line: usize, text: String },

    /// Model artifact failed structural validation.
    #[error("corrupt model artifact: {0}")]
    CorruptArtifact(String),

    /// Correction attempted before a model was loaded or trained.
    #[error("corrector not ready: no model loaded or trained")]
    NotReady,

    /// Required configuration key missing or numerically out of range.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),
}

impl From<bincode::Error> for CorrectorError {
    fn from(e: bincode::Error) -> Self {
        CorrectorError::CorruptArtifact(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CorrectorError>;

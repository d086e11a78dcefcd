//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors raised by `stoat-core` primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid distribution parameters: {0}")]
    InvalidDistribution(String),

    #[error("categorical draw over {candidates} candidates has no positive weight")]
    DegenerateWeights { candidates: usize },
}

/// Shorthand result type for `stoat-core`.
pub type CoreResult<T> = Result<T, CoreError>;

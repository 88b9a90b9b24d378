//! Sigma Protocol Error Types

use privacyzk_curve::CurveError;
use thiserror::Error;

/// Errors from Sigma proof generation and verification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigmaError {
    /// A proof component failed decoding (wrong size, bad point, bad scalar)
    #[error("Bad encoding: {0}")]
    BadEncoding(String),

    /// Challenge mismatch or verification equation mismatch.
    ///
    /// Deliberately does not say which check failed.
    #[error("Proof verification failed")]
    VerifyFailed,

    /// Proof generation failed (commitment or encoding error)
    #[error("Proof generation failed: {0}")]
    ProveFailed(String),

    /// Proving was abandoned at a scalar-multiplication boundary
    #[error("Proving cancelled")]
    Cancelled,
}

impl From<CurveError> for SigmaError {
    fn from(e: CurveError) -> Self {
        SigmaError::BadEncoding(e.to_string())
    }
}

/// Result type for Sigma protocol operations
pub type SigmaResult<T> = Result<T, SigmaError>;

//! Commitment Error Types

use privacyzk_curve::CurveError;
use thiserror::Error;

/// Errors from the Pedersen commitment scheme
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitmentError {
    /// Underlying curve or scalar failure
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Commitment would be the identity point (trivial opening)
    #[error("Commitment is the identity point")]
    IdentityCommitment,

    /// Commitment bytes failed validation
    #[error("Invalid commitment: {0}")]
    InvalidCommitment(String),
}

/// Result type for commitment operations
pub type CommitmentResult<T> = Result<T, CommitmentError>;

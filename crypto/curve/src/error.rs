//! Curve Error Types

use thiserror::Error;

/// Errors from curve and field operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    /// Point failed decoding: off-curve, wrong length, or bad prefix
    #[error("Invalid point: {0}")]
    InvalidPoint(String),

    /// Identity point where a non-identity point is required
    #[error("Identity point is forbidden here")]
    IdentityPoint,

    /// Scalar bytes are not a canonical field element
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    /// Hash-to-curve failed to find a point (practically unreachable)
    #[error("Hash-to-curve exhausted {0} attempts")]
    HashToCurveExhausted(u32),
}

/// Result type for curve operations
pub type CurveResult<T> = Result<T, CurveError>;

//! Statement Error Types
//!
//! The failure taxonomy surfaced to callers. Cryptographic failures are
//! never retried; they carry the failing check, not the reason the check
//! failed.

use privacyzk_sigma::SigmaError;
use thiserror::Error;

/// Errors from statement proving and verification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    /// Scalar, point, or CBOR decoding failed, or a field has the wrong size
    #[error("Bad encoding: {0}")]
    BadEncoding(String),

    /// Off-curve point, or identity point where forbidden
    #[error("Invalid point: {0}")]
    InvalidPoint(String),

    /// Unknown statement type/version, or missing/mismatched public inputs
    #[error("Bad statement metadata: {0}")]
    BadMetadata(String),

    /// Merkle path length mismatch or recomputed root differs
    #[error("Merkle path verification failed")]
    BadMerklePath,

    /// Schnorr or Chaum-Pedersen equation/challenge mismatch
    #[error("Proof of knowledge rejected")]
    PoKRejected,

    /// Recomputed session tag differs from the claimed tag
    #[error("Session tag mismatch")]
    TagMismatch,

    /// Prover-side failure (bad witness, commitment error)
    #[error("Proof generation failed: {0}")]
    ProofGeneration(String),

    /// Proving was abandoned at a cancellation checkpoint
    #[error("Proving cancelled")]
    Cancelled,
}

impl From<SigmaError> for StatementError {
    fn from(e: SigmaError) -> Self {
        match e {
            SigmaError::BadEncoding(msg) => StatementError::BadEncoding(msg),
            SigmaError::VerifyFailed => StatementError::PoKRejected,
            SigmaError::ProveFailed(msg) => StatementError::ProofGeneration(msg),
            SigmaError::Cancelled => StatementError::Cancelled,
        }
    }
}

impl From<privacyzk_curve::CurveError> for StatementError {
    fn from(e: privacyzk_curve::CurveError) -> Self {
        match e {
            privacyzk_curve::CurveError::InvalidPoint(msg) => StatementError::InvalidPoint(msg),
            privacyzk_curve::CurveError::IdentityPoint => {
                StatementError::InvalidPoint("identity point".into())
            }
            other => StatementError::BadEncoding(other.to_string()),
        }
    }
}

impl From<privacyzk_commitment::CommitmentError> for StatementError {
    fn from(e: privacyzk_commitment::CommitmentError) -> Self {
        match e {
            privacyzk_commitment::CommitmentError::IdentityCommitment => {
                StatementError::InvalidPoint("identity commitment".into())
            }
            privacyzk_commitment::CommitmentError::Curve(c) => c.into(),
            privacyzk_commitment::CommitmentError::InvalidCommitment(msg) => {
                StatementError::BadEncoding(msg)
            }
        }
    }
}

/// Result type for statement operations
pub type StatementResult<T> = Result<T, StatementError>;

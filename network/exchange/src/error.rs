//! Proof-Exchange Error Types

use thiserror::Error;

/// Errors from the proof-exchange protocol
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// CBOR or frame decoding failed
    #[error("Bad encoding: {0}")]
    BadEncoding(String),

    /// A message failed schema validation
    #[error("Schema error: {0}")]
    Schema(String),

    /// A message or payload exceeds a configured size limit
    #[error("Size limit exceeded: {0}")]
    SizeLimit(String),

    /// Frame body larger than the 1 MiB cap
    #[error("Oversize frame: {0} bytes")]
    OversizeFrame(usize),

    /// Deadline exceeded
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Stream closed mid-exchange
    #[error("Peer closed the stream")]
    PeerClosed,

    /// Proving or asset resolution failed server-side
    #[error("Provider error: {0}")]
    Provider(String),

    /// The requested statement artifacts are not available
    #[error("Not available: {0}")]
    NotAvailable(String),

    /// Exchange was cancelled
    #[error("Cancelled")]
    Cancelled,

    /// Underlying socket error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Statement-layer failure surfaced with its statement tag
    #[error("Statement {tag}: {source}")]
    Statement {
        /// Surfaced statement tag, e.g. `membership_v2`
        tag: String,
        /// The failing check
        #[source]
        source: privacyzk_statements::StatementError,
    },
}

/// Result type for exchange operations
pub type ExchangeResult<T> = Result<T, ExchangeError>;

//! PRIVACYZK Proof-Exchange Protocol
//!
//! Carries privacy proofs between peers over a single bidirectional
//! stream, protocol id `/privacyzk/1.0.0`.
//!
//! # Exchange shape
//!
//! ```text
//! client                                server
//!   | -- ProofRequest ----------------->  |
//!   |  <---------------- ProofResponse -- |   (membership)
//!   |  <---------------- ProofResponse -- |   (continuity)
//!   |  <---------------- ProofResponse -- |   (unlinkability)
//!   |  <------------------- EndOfBatch -- |
//! ```
//!
//! Every frame is `len:u32_be || body_cbor`, body at most 1 MiB. Within
//! one request, responses are delivered in the fixed statement order
//! regardless of which proof finished first; the server buffers
//! completions and releases them in order. Either side closing the stream
//! cancels in-flight proving; no partial proof is ever emitted.
//!
//! The underlying p2p host is an external collaborator: the protocol here
//! is generic over `AsyncRead + AsyncWrite` streams, with a TCP binding
//! for the demo endpoints.

pub mod addr;
pub mod client;
pub mod error;
pub mod frames;
pub mod messages;
pub mod provider;
pub mod server;

pub use addr::{multiaddr_to_socketaddr, socketaddr_to_multiaddr};
pub use client::{demo_status, ClientConfig, ExchangeClient, OutcomeStatus, StatementOutcome};
pub use error::{ExchangeError, ExchangeResult};
pub use frames::{read_frame, read_message, write_frame, write_message};
pub use messages::{
    Frame, ProofRequest, ProofResponse, ResponseMeta, ResponseStatus, StatementSelector,
    WireStatement,
};
pub use privacyzk_statements::CancelFlag;
pub use provider::{FixtureProvider, ProofPayload, ProofProvider, SigmaProvider};
pub use server::{serve_connection, ExchangeServer, ServerConfig};

/// Protocol identifier offered by the server
pub const PROTOCOL_ID: &str = "/privacyzk/1.0.0";

/// Wire message version
pub const MSG_VERSION: u8 = 1;

/// Statement schema version pinned on the wire (matches the `v2` asset
/// subtree; a config-fixed constant, not negotiated)
pub const SCHEMA_VERSION: u8 = 2;

/// Membership anonymity-set depth on the wire
pub const WIRE_MEMBERSHIP_DEPTH: u8 = 16;

/// Maximum frame body size
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;

/// Maximum encoded request size
pub const MAX_REQUEST_BYTES: usize = 8192;

/// Maximum proof payload inside one response
pub const MAX_PROOF_BYTES: usize = 4096;

/// Maximum error string length inside one response
pub const MAX_ERROR_CHARS: usize = 256;

/// Request nonce length bounds (inclusive)
pub const NONCE_MIN_LEN: usize = 16;
/// Upper bound for accepted request nonces
pub const NONCE_MAX_LEN: usize = 64;

/// Default end-to-end exchange timeout, both sides
pub const DEFAULT_TOTAL_TIMEOUT_SECS: u64 = 120;

/// Per-frame read/write timeout
pub const FRAME_TIMEOUT_SECS: u64 = 5;

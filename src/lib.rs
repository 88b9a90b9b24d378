//! PRIVACYZK: Cryptographic Privacy Proofs for Peer-to-Peer Networks
//!
//! This is the root crate that re-exports the privacy-proof core for
//! integration testing and provides unified access to the protocol
//! primitives.
//!
//! ## Architecture Overview
//!
//! Three non-interactive zero-knowledge statements built from Pedersen
//! commitments and Sigma protocols on secp256k1, carried between peers by
//! a framed, versioned proof-exchange protocol:
//!
//! - **Anonymity-set membership**: a commitment to the peer's hidden
//!   identity is a leaf of a Merkle anonymity set
//! - **Session unlinkability**: session tags derived from fresh
//!   commitments cannot be linked across contexts
//! - **Identity continuity**: two commitments share one hidden identity
//!
//! ## Crate Organization
//!
//! - `privacyzk-curve`: secp256k1 scalar/point primitives, fork-safe RNG
//! - `privacyzk-commitment`: Pedersen commitments and generators
//! - `privacyzk-sigma`: Schnorr and Chaum-Pedersen proofs, Fiat-Shamir
//! - `privacyzk-merkle`: domain-separated Merkle accumulator
//! - `privacyzk-statements`: typed statements, registry, proof envelope
//! - `privacyzk-assets`: pre-generated artifact loader
//! - `privacyzk-exchange`: framed proof-exchange protocol and endpoints

// Re-export all crates for integration testing
pub use privacyzk_assets as assets;
pub use privacyzk_commitment as commitment;
pub use privacyzk_curve as curve;
pub use privacyzk_exchange as exchange;
pub use privacyzk_merkle as merkle;
pub use privacyzk_sigma as sigma;
pub use privacyzk_statements as statements;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol constants
pub mod protocol {
    /// Proof-exchange protocol identifier
    pub const ID: &str = privacyzk_exchange::PROTOCOL_ID;
    /// Wire message version
    pub const MSG_VERSION: u8 = privacyzk_exchange::MSG_VERSION;
    /// Statement schema version pinned on the wire
    pub const SCHEMA_VERSION: u8 = privacyzk_exchange::SCHEMA_VERSION;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use privacyzk_commitment::{Commitment, Params};
    pub use privacyzk_curve::{Point, Scalar, SecureRng};
    pub use privacyzk_exchange::{
        ClientConfig, ExchangeClient, ExchangeServer, FixtureProvider, ServerConfig,
        SigmaProvider, StatementSelector, WireStatement,
    };
    pub use privacyzk_merkle::{MerklePath, MerkleTree};
    pub use privacyzk_sigma::{EqualityProof, SchnorrProof};
    pub use privacyzk_statements::{
        identity_scalar, verify_proof, CancelFlag, ProofBackend, ProofContext, StatementType,
        ZKProof,
    };
}

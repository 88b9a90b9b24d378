//! PRIVACYZK Pedersen Commitments
//!
//! `C = v*G + r*H` over secp256k1, where `H` is derived by hash-to-curve so
//! its discrete log relative to `G` is unknown.
//!
//! Properties:
//! - **Hiding**: the commitment reveals nothing about `v`
//! - **Binding**: the committed value cannot be changed after the fact
//! - **Homomorphic**: `commit(v1, r1) + commit(v2, r2) = commit(v1+v2, r1+r2)`
//!
//! Verification is lenient modulo the group order so that homomorphic sums
//! verify against reduced openings; this is the only allowed laxness in the
//! scheme. Producing the identity point (the trivially-opening `(0, 0)`
//! pair) is rejected at commit time.

pub mod error;
pub mod params;
pub mod pedersen;

pub use error::{CommitmentError, CommitmentResult};
pub use params::Params;
pub use pedersen::{add_blindings, add_values, Commitment, Opening};

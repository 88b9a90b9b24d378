//! PRIVACYZK Sigma Protocols
//!
//! Non-interactive proofs of knowledge over Pedersen commitments, made
//! non-interactive with a length-prefixed Fiat-Shamir transform:
//!
//! - **Schnorr PoK of opening** — prover knows `(v, r)` with `C = v*G + r*H`
//! - **Chaum-Pedersen equality PoK** — two commitments share one hidden
//!   scalar: `C1 = id*G + r1*H`, `C2 = id*G + r2*H`
//!
//! Challenge computation hashes every transcript field behind a 4-byte
//! big-endian length prefix, which keeps field boundaries unambiguous when
//! variable-length context data is folded in. Challenge comparison on the
//! verifier side is constant-time; this is the only formally constant-time
//! operation in the crate (scalar multiplication is whatever the curve
//! library provides).
//!
//! Provers poll a [`CancelFlag`] before each group of scalar
//! multiplications, so a caller running proofs on a worker pool can
//! abandon them mid-protocol without ever seeing a partial proof.

pub mod cancel;
pub mod chaum_pedersen;
pub mod error;
pub mod schnorr;
pub mod transcript;

pub use cancel::CancelFlag;
pub use chaum_pedersen::{EqualityProof, EqualityWitness};
pub use error::{SigmaError, SigmaResult};
pub use schnorr::{SchnorrProof, SchnorrWitness};
pub use transcript::{challenge_bytes, challenge_scalar};

//! PRIVACYZK Privacy Statements
//!
//! The typed statement layer on top of the commitment and Sigma-protocol
//! primitives. Four non-interactive statements are supported:
//!
//! - **Anonymity-set membership** — a commitment to the prover's hidden
//!   identity sits in a Merkle-tree anonymity set
//! - **Session unlinkability** — a session tag is correctly formed from a
//!   fresh commitment; fresh blindings make sessions unlinkable
//! - **Identity continuity** — two commitments share one hidden identity
//! - **Commitment opening** — the prover knows an opening of a commitment
//!   bound to a session context (the building block of the other three)
//!
//! Every proof travels as a self-contained [`ZKProof`] envelope in canonical
//! CBOR; the [`registry`] maps `(type, version)` pairs to descriptors and
//! refuses to dispatch anything unknown or malformed.

pub mod backend;
pub mod context;
pub mod continuity;
pub mod error;
pub mod identity;
pub mod membership;
pub mod opening;
pub mod proof;
pub mod registry;
pub mod unlinkability;

pub use backend::ProofBackend;
pub use context::ProofContext;
pub use error::{StatementError, StatementResult};
pub use identity::identity_scalar;
pub use privacyzk_sigma::CancelFlag;
pub use proof::{StatementBody, ZKProof, PROOF_SCHEMA_VERSION};
pub use registry::{descriptor, verify_proof, StatementDescriptor, StatementType};

/// Domain separator for the membership statement challenge
pub const MEMBERSHIP_DOMAIN: &[u8] = b"MEMBERSHIP_PROOF_V1";

/// Domain separator recorded in unlinkability public inputs
pub const UNLINKABILITY_DOMAIN: &[u8] = b"UNLINKABILITY_PROOF_V1";

/// Domain separator for the session-tag derivation
pub const UNLINKABILITY_TAG_DOMAIN: &[u8] = b"UNLINKABILITY_TAG_V1";

/// Domain separator for the unlinkability challenge
pub const UNLINKABILITY_CHALLENGE_DOMAIN: &[u8] = b"UNLINKABILITY_CHALLENGE_V1";

/// Domain separator recorded in continuity public inputs
pub const CONTINUITY_DOMAIN: &[u8] = b"CONTINUITY_PROOF_V1";

/// Domain separator for the continuity challenge
pub const CONTINUITY_CHALLENGE_DOMAIN: &[u8] = b"CONTINUITY_CHALLENGE_V1";

/// Domain separator for the commitment-opening statement challenge
pub const OPENING_DOMAIN: &[u8] = b"COMMITMENT_OPENING_POK_V1";

/// Membership anonymity-set depth used by the demo profile
pub const DEMO_MEMBERSHIP_DEPTH: usize = 16;

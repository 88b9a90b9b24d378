//! Statement registry
//!
//! Static map from `(type_tag, version)` to a statement descriptor.
//! Verification dispatches through this table and refuses anything it
//! does not know; there is no dynamic registration and no trait object on
//! the verification path.

use crate::error::{StatementError, StatementResult};
use crate::proof::{StatementBody, ZKProof};
use crate::{
    continuity, membership, opening, unlinkability, CONTINUITY_CHALLENGE_DOMAIN,
    CONTINUITY_DOMAIN, DEMO_MEMBERSHIP_DEPTH, MEMBERSHIP_DOMAIN, OPENING_DOMAIN,
    UNLINKABILITY_CHALLENGE_DOMAIN, UNLINKABILITY_DOMAIN,
};

/// The supported statement kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatementType {
    /// Anonymity-set membership
    Membership,
    /// Session unlinkability
    Unlinkability,
    /// Identity continuity
    Continuity,
    /// Commitment opening
    Opening,
}

impl StatementType {
    /// Wire-facing type tag
    pub fn tag(&self) -> &'static str {
        match self {
            StatementType::Membership => "anon_set_membership_v1",
            StatementType::Unlinkability => "session_unlinkability_v1",
            StatementType::Continuity => "identity_continuity_v1",
            StatementType::Opening => "commitment_opening_v1",
        }
    }

    /// Parse a type tag
    pub fn from_tag(tag: &str) -> Option<StatementType> {
        match tag {
            "anon_set_membership_v1" => Some(StatementType::Membership),
            "session_unlinkability_v1" => Some(StatementType::Unlinkability),
            "identity_continuity_v1" => Some(StatementType::Continuity),
            "commitment_opening_v1" => Some(StatementType::Opening),
            _ => None,
        }
    }
}

/// Descriptor of one `(type, version)` statement.
///
/// `domain_sep` and `transcript_layout` form the upgrade seam: swapping
/// the transcript hash or the proof system is expressed as a new
/// `(type, version + 1)` entry with a new descriptor, and old versions
/// stay verifiable.
#[derive(Debug)]
pub struct StatementDescriptor {
    /// Statement kind
    pub statement_type: StatementType,
    /// Wire type tag
    pub type_tag: &'static str,
    /// Statement version
    pub version: u16,
    /// Domain separator recorded in public inputs
    pub domain_sep: &'static [u8],
    /// Domain separator folded into the Fiat-Shamir challenge
    pub challenge_domain: &'static [u8],
    /// Required public-input keys (short CBOR keys, sorted)
    pub required_keys: &'static [&'static str],
    /// Challenge transcript layout, in hash order
    pub transcript_layout: &'static [&'static str],
    /// Fixed Merkle depth, for statements that carry a path
    pub merkle_depth: Option<usize>,
}

static REGISTRY: &[StatementDescriptor] = &[
    StatementDescriptor {
        statement_type: StatementType::Membership,
        type_tag: "anon_set_membership_v1",
        version: 1,
        domain_sep: MEMBERSHIP_DOMAIN,
        challenge_domain: MEMBERSHIP_DOMAIN,
        required_keys: &["c", "d", "h", "p", "r"],
        transcript_layout: &["domain_sep", "root", "commitment", "announcement", "ctx_hash"],
        merkle_depth: Some(DEMO_MEMBERSHIP_DEPTH),
    },
    StatementDescriptor {
        statement_type: StatementType::Unlinkability,
        type_tag: "session_unlinkability_v1",
        version: 1,
        domain_sep: UNLINKABILITY_DOMAIN,
        challenge_domain: UNLINKABILITY_CHALLENGE_DOMAIN,
        required_keys: &["c", "d", "h", "t"],
        transcript_layout: &["domain_sep", "tag", "commitment", "announcement", "ctx_hash"],
        merkle_depth: None,
    },
    StatementDescriptor {
        statement_type: StatementType::Continuity,
        type_tag: "identity_continuity_v1",
        version: 1,
        domain_sep: CONTINUITY_DOMAIN,
        challenge_domain: CONTINUITY_CHALLENGE_DOMAIN,
        required_keys: &["a", "b", "d", "h"],
        transcript_layout: &[
            "domain_sep",
            "commitment_1",
            "commitment_2",
            "announcement_1",
            "announcement_2",
            "ctx_hash",
        ],
        merkle_depth: None,
    },
    StatementDescriptor {
        statement_type: StatementType::Opening,
        type_tag: "commitment_opening_v1",
        version: 1,
        domain_sep: OPENING_DOMAIN,
        challenge_domain: OPENING_DOMAIN,
        required_keys: &["c", "d", "h"],
        transcript_layout: &["domain_sep", "g", "h", "commitment", "announcement", "ctx_hash"],
        merkle_depth: None,
    },
];

/// Look up a descriptor by wire tag and version
pub fn lookup(type_tag: &str, version: u16) -> Option<&'static StatementDescriptor> {
    REGISTRY
        .iter()
        .find(|d| d.type_tag == type_tag && d.version == version)
}

/// Look up the current descriptor for a statement kind
pub fn descriptor(statement_type: StatementType) -> &'static StatementDescriptor {
    REGISTRY
        .iter()
        .find(|d| d.statement_type == statement_type)
        .expect("every statement type has a registry entry")
}

/// Verify any proof envelope.
///
/// Registry validation first: the `(type, version)` pair must be known and
/// must match the body variant. Dispatch is a static match; a proof either
/// verifies completely or fails with the first error — never partially.
pub fn verify_proof(proof: &ZKProof) -> StatementResult<()> {
    let desc = lookup(&proof.statement_type, proof.statement_version).ok_or_else(|| {
        StatementError::BadMetadata(format!(
            "unknown statement ({}, v{})",
            proof.statement_type, proof.statement_version
        ))
    })?;

    if proof.body.type_tag() != desc.type_tag {
        return Err(StatementError::BadMetadata(format!(
            "envelope type {} does not match body {}",
            desc.type_tag,
            proof.body.type_tag()
        )));
    }

    match &proof.body {
        StatementBody::Membership(statement) => {
            membership::verify(statement, &proof.context_hash, desc.merkle_depth)
        }
        StatementBody::Unlinkability(statement) => {
            unlinkability::verify(statement, &proof.context_hash)
        }
        StatementBody::Continuity(statement) => continuity::verify(statement, &proof.context_hash),
        StatementBody::Opening(statement) => opening::verify(statement, &proof.context_hash),
    }
}

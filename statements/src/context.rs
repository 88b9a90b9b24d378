//! Proof context: the binding envelope folded into every challenge

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Context a proof is bound to.
///
/// Two proofs with different contexts produce different challenges and can
/// never be replayed against each other. Metadata keys are kept sorted so
/// canonicalization is byte-stable regardless of insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProofContext {
    /// Peer generating or requesting the proof
    pub peer_id: String,
    /// Session the proof belongs to
    pub session_id: String,
    /// Extra binding data, sorted by key
    pub metadata: BTreeMap<String, Vec<u8>>,
    /// Unix timestamp (seconds); fixed by the caller, not sampled here
    pub timestamp: u64,
}

impl ProofContext {
    /// Create a context for a peer/session pair
    pub fn new(peer_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            peer_id: peer_id.into(),
            session_id: session_id.into(),
            metadata: BTreeMap::new(),
            timestamp: 0,
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Canonical byte serialization.
    ///
    /// Length-prefixed concatenation (4-byte big-endian lengths) of
    /// `peer_id`, `session_id`, the metadata entry count, each sorted
    /// `(key, value)` pair, and the timestamp. Field boundaries are framed
    /// so distinct contexts can never concatenate to equal bytes.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        push_prefixed(&mut out, self.peer_id.as_bytes());
        push_prefixed(&mut out, self.session_id.as_bytes());
        out.extend_from_slice(&(self.metadata.len() as u32).to_be_bytes());
        for (key, value) in &self.metadata {
            push_prefixed(&mut out, key.as_bytes());
            push_prefixed(&mut out, value);
        }
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out
    }

    /// 32-byte context hash folded into every challenge
    pub fn ctx_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_bytes());
        hasher.finalize().into()
    }
}

fn push_prefixed(out: &mut Vec<u8>, field: &[u8]) {
    out.extend_from_slice(&(field.len() as u32).to_be_bytes());
    out.extend_from_slice(field);
}

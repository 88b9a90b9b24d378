//! PRIVACYZK Merkle Accumulator
//!
//! Binary SHA-256 tree at a fixed depth, used as the anonymity-set
//! accumulator for membership statements.
//!
//! - Leaves and internal nodes are hashed under distinct domain tags so a
//!   leaf can never be reinterpreted as an internal node
//! - Empty slots are filled with a deterministic zero-leaf, so the root is
//!   defined for every index up to `2^depth - 1`
//! - A path witness is an ordered list of `(sibling, sibling_is_left)`
//!   pairs of length exactly `depth`; depth 0 degenerates to leaf == root

pub mod error;
pub mod tree;

pub use error::{MerkleError, MerkleResult};
pub use tree::{verify_path, MerklePath, MerkleTree, PathStep};

use sha2::{Digest, Sha256};

/// Domain tag for leaf hashing
pub const LEAF_DOMAIN: &[u8] = b"MERKLE_LEAF_V1";

/// Domain tag for internal-node hashing
pub const NODE_DOMAIN: &[u8] = b"MERKLE_NODE_V1";

/// Canonical zero-leaf filling empty slots
pub const ZERO_LEAF: [u8; 32] = [0u8; 32];

/// Hash a leaf: `SHA-256(LEAF_DOMAIN || data)`
pub fn leaf_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(LEAF_DOMAIN);
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash an internal node: `SHA-256(NODE_DOMAIN || left || right)`.
///
/// Fixed left||right ordering; sidedness travels in the path witness.
pub fn node_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(NODE_DOMAIN);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

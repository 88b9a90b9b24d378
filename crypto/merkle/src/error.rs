//! Merkle Error Types

use thiserror::Error;

/// Errors from Merkle tree construction and path handling
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// More leaves than the fixed depth can hold
    #[error("Tree at depth {depth} holds at most {capacity} leaves, got {count}")]
    TreeFull {
        depth: usize,
        capacity: usize,
        count: usize,
    },

    /// Depth outside the supported range
    #[error("Depth {0} out of range (max {max})", max = crate::tree::MAX_DEPTH)]
    DepthOutOfRange(usize),

    /// Leaf index beyond the populated leaves
    #[error("Leaf index {index} out of range ({count} leaves)")]
    IndexOutOfRange { index: usize, count: usize },

    /// Path has the wrong length for the statement's depth
    #[error("Path length {got} does not match depth {expected}")]
    BadPathLength { expected: usize, got: usize },
}

/// Result type for Merkle operations
pub type MerkleResult<T> = Result<T, MerkleError>;

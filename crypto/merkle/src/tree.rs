//! Fixed-depth tree construction and path witnesses

use serde::{Deserialize, Serialize};

use crate::error::{MerkleError, MerkleResult};
use crate::{node_hash, ZERO_LEAF};

/// Largest supported depth. 2^32 leaves is far beyond any anonymity set
/// this toolkit handles; the bound keeps arithmetic in `usize` safe.
pub const MAX_DEPTH: usize = 32;

/// One step of an authentication path: the sibling hash and which side of
/// the pair it sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Sibling node hash
    #[serde(with = "serde_bytes")]
    pub sibling: [u8; 32],
    /// `true` when the sibling is the left child at this level
    pub sibling_is_left: bool,
}

/// Authentication path from a leaf to the root; exactly `depth` steps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath(pub Vec<PathStep>);

impl MerklePath {
    /// Number of steps (equals the tree depth)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path is empty (depth-0 tree)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the steps leaf-to-root
    pub fn steps(&self) -> impl Iterator<Item = &PathStep> {
        self.0.iter()
    }
}

/// Binary Merkle tree at a fixed depth with zero-leaf padding.
///
/// Only the populated prefix of each level is materialized; empty
/// subtrees use precomputed per-level zero hashes, so a sparse depth-16
/// demo tree costs a handful of hashes rather than 2^16.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    depth: usize,
    /// Populated node hashes per level; `levels[0]` are the leaves
    levels: Vec<Vec<[u8; 32]>>,
    /// Hash of the all-empty subtree per level
    zero_hashes: Vec<[u8; 32]>,
    root: [u8; 32],
}

impl MerkleTree {
    /// Build a tree of the given depth over the leaf hashes.
    ///
    /// Leaves beyond the populated prefix are the canonical zero-leaf.
    pub fn build(leaves: &[[u8; 32]], depth: usize) -> MerkleResult<MerkleTree> {
        if depth > MAX_DEPTH {
            return Err(MerkleError::DepthOutOfRange(depth));
        }
        let capacity = 1usize << depth;
        if leaves.len() > capacity {
            return Err(MerkleError::TreeFull {
                depth,
                capacity,
                count: leaves.len(),
            });
        }

        let mut zero_hashes = Vec::with_capacity(depth + 1);
        zero_hashes.push(ZERO_LEAF);
        for level in 0..depth {
            let below = zero_hashes[level];
            zero_hashes.push(node_hash(&below, &below));
        }

        let mut levels: Vec<Vec<[u8; 32]>> = Vec::with_capacity(depth + 1);
        levels.push(leaves.to_vec());
        for level in 0..depth {
            let below = &levels[level];
            let width = below.len().div_ceil(2);
            let mut above = Vec::with_capacity(width);
            for pair in 0..width {
                let left = Self::node_at(below, &zero_hashes, level, 2 * pair);
                let right = Self::node_at(below, &zero_hashes, level, 2 * pair + 1);
                above.push(node_hash(&left, &right));
            }
            levels.push(above);
        }

        let root = Self::node_at(&levels[depth], &zero_hashes, depth, 0);

        Ok(MerkleTree {
            depth,
            levels,
            zero_hashes,
            root,
        })
    }

    /// Tree root
    pub fn root(&self) -> &[u8; 32] {
        &self.root
    }

    /// Tree depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of populated leaves
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Authentication path for a populated leaf, leaf-to-root, exactly
    /// `depth` steps.
    pub fn path(&self, index: usize) -> MerkleResult<MerklePath> {
        if index >= self.leaf_count() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                count: self.leaf_count(),
            });
        }

        let mut steps = Vec::with_capacity(self.depth);
        let mut position = index;
        for level in 0..self.depth {
            let sibling_is_left = position % 2 == 1;
            let sibling_index = if sibling_is_left {
                position - 1
            } else {
                position + 1
            };
            let sibling =
                Self::node_at(&self.levels[level], &self.zero_hashes, level, sibling_index);
            steps.push(PathStep {
                sibling,
                sibling_is_left,
            });
            position /= 2;
        }

        Ok(MerklePath(steps))
    }

    fn node_at(
        level_nodes: &[[u8; 32]],
        zero_hashes: &[[u8; 32]],
        level: usize,
        index: usize,
    ) -> [u8; 32] {
        level_nodes
            .get(index)
            .copied()
            .unwrap_or(zero_hashes[level])
    }
}

/// Walk an authentication path and compare the terminal hash to `root`.
///
/// The walk is deterministic and the comparison is byte-for-byte; the
/// caller is responsible for checking the path length against the
/// statement's configured depth.
pub fn verify_path(leaf: &[u8; 32], path: &MerklePath, root: &[u8; 32]) -> bool {
    let mut current = *leaf;
    for step in path.steps() {
        current = if step.sibling_is_left {
            node_hash(&step.sibling, &current)
        } else {
            node_hash(&current, &step.sibling)
        };
    }
    current == *root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf_hash;

    fn leaves(n: usize) -> Vec<[u8; 32]> {
        (0..n)
            .map(|i| leaf_hash(format!("leaf-{i}").as_bytes()))
            .collect()
    }

    #[test]
    fn depth_zero_single_leaf_is_root() {
        let leaf = leaf_hash(b"only");
        let tree = MerkleTree::build(&[leaf], 0).unwrap();
        assert_eq!(tree.root(), &leaf);

        let path = tree.path(0).unwrap();
        assert!(path.is_empty());
        assert!(verify_path(&leaf, &path, tree.root()));
    }

    #[test]
    fn depth_zero_rejects_two_leaves() {
        let err = MerkleTree::build(&leaves(2), 0).unwrap_err();
        assert!(matches!(err, MerkleError::TreeFull { .. }));
    }

    #[test]
    fn all_paths_verify() {
        let leaves = leaves(5);
        let tree = MerkleTree::build(&leaves, 4).unwrap();
        for (i, leaf) in leaves.iter().enumerate() {
            let path = tree.path(i).unwrap();
            assert_eq!(path.len(), 4);
            assert!(verify_path(leaf, &path, tree.root()));
        }
    }

    #[test]
    fn left_only_population_verifies() {
        // Only the left half of a depth-3 tree populated
        let leaves = leaves(4);
        let tree = MerkleTree::build(&leaves, 3).unwrap();
        for (i, leaf) in leaves.iter().enumerate() {
            assert!(verify_path(leaf, &tree.path(i).unwrap(), tree.root()));
        }
    }

    #[test]
    fn deep_sparse_tree_verifies() {
        let leaves = leaves(3);
        let tree = MerkleTree::build(&leaves, 16).unwrap();
        let path = tree.path(2).unwrap();
        assert_eq!(path.len(), 16);
        assert!(verify_path(&leaves[2], &path, tree.root()));
    }

    #[test]
    fn wrong_leaf_fails() {
        let leaves = leaves(4);
        let tree = MerkleTree::build(&leaves, 4).unwrap();
        let path = tree.path(1).unwrap();
        assert!(!verify_path(&leaves[2], &path, tree.root()));
    }

    #[test]
    fn flipped_sibling_byte_fails() {
        let leaves = leaves(4);
        let tree = MerkleTree::build(&leaves, 4).unwrap();
        let mut path = tree.path(0).unwrap();
        path.0[2].sibling[0] ^= 0x01;
        assert!(!verify_path(&leaves[0], &path, tree.root()));
    }

    #[test]
    fn flipped_root_byte_fails() {
        let leaves = leaves(4);
        let tree = MerkleTree::build(&leaves, 4).unwrap();
        let path = tree.path(0).unwrap();
        let mut root = *tree.root();
        root[31] ^= 0x01;
        assert!(!verify_path(&leaves[0], &path, &root));
    }

    #[test]
    fn flipped_direction_fails() {
        let leaves = leaves(4);
        let tree = MerkleTree::build(&leaves, 4).unwrap();
        let mut path = tree.path(0).unwrap();
        path.0[0].sibling_is_left = !path.0[0].sibling_is_left;
        assert!(!verify_path(&leaves[0], &path, tree.root()));
    }

    #[test]
    fn root_changes_with_leaves() {
        let t1 = MerkleTree::build(&leaves(4), 4).unwrap();
        let t2 = MerkleTree::build(&leaves(5), 4).unwrap();
        assert_ne!(t1.root(), t2.root());
    }

    #[test]
    fn empty_tree_has_defined_root() {
        let tree = MerkleTree::build(&[], 4).unwrap();
        let expected = {
            // Fold the zero-leaf up four levels
            let mut h = ZERO_LEAF;
            for _ in 0..4 {
                h = node_hash(&h, &h);
            }
            h
        };
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn path_index_out_of_range() {
        let tree = MerkleTree::build(&leaves(2), 4).unwrap();
        assert!(tree.path(2).is_err());
    }

    #[test]
    fn depth_limit_enforced() {
        assert!(MerkleTree::build(&[], MAX_DEPTH + 1).is_err());
    }
}

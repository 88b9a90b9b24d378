//! Proof backend: generate and verify statements for a peer context
//!
//! The single entry point consumed by the exchange server (prove-mode
//! `sigma`) and the analyzer front-end. Witness material (identity
//! scalar, blindings, nonces) lives only inside each call and is wiped
//! when the proof is assembled.

use privacyzk_commitment::Commitment;
use privacyzk_curve::{Scalar, SecureRng};
use privacyzk_merkle::{leaf_hash, MerkleTree};
use privacyzk_sigma::CancelFlag;
use tracing::debug;

use crate::context::ProofContext;
use crate::error::{StatementError, StatementResult};
use crate::identity::identity_scalar;
use crate::proof::ZKProof;
use crate::registry;
use crate::{continuity, membership, unlinkability};
use crate::{opening, DEMO_MEMBERSHIP_DEPTH};

/// Default number of members in the demo anonymity set
const DEFAULT_SET_SIZE: usize = 8;

/// Statement prover/verifier bound to a parameter profile.
#[derive(Debug, Clone)]
pub struct ProofBackend {
    /// Merkle depth for membership statements
    membership_depth: usize,
    /// Demo anonymity-set size (prover side)
    anonymity_set_size: usize,
    /// Cancellation flag threaded into every prover
    cancel: CancelFlag,
}

impl Default for ProofBackend {
    fn default() -> Self {
        Self {
            membership_depth: DEMO_MEMBERSHIP_DEPTH,
            anonymity_set_size: DEFAULT_SET_SIZE,
            cancel: CancelFlag::new(),
        }
    }
}

impl ProofBackend {
    /// Backend with the demo profile (membership depth 16)
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the membership tree depth
    pub fn with_membership_depth(mut self, depth: usize) -> Self {
        self.membership_depth = depth;
        self
    }

    /// Override the demo anonymity-set size
    pub fn with_set_size(mut self, size: usize) -> Self {
        self.anonymity_set_size = size;
        self
    }

    /// Share a cancellation flag with the caller.
    ///
    /// Provers poll the flag at scalar-multiplication boundaries, so a
    /// network task can abandon proofs already running on a CPU pool.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Membership tree depth this backend proves at
    pub fn membership_depth(&self) -> usize {
        self.membership_depth
    }

    /// Generate a membership proof for the context's peer.
    ///
    /// Builds a demo anonymity set around the prover's commitment: the
    /// other members are synthetic commitments, and the prover's leaf sits
    /// at a random index.
    pub fn membership(&self, context: &ProofContext) -> StatementResult<ZKProof> {
        let mut rng = SecureRng::new();
        let identity = identity_scalar(&context.peer_id);
        let blinding = Scalar::random_nonzero(&mut rng);
        self.cancel.checkpoint()?;
        let commitment = Commitment::commit(&identity, &blinding)?;

        let set_size = self.anonymity_set_size.max(1);
        let own_index = u64::from_be_bytes(rng.random_array()) as usize % set_size;

        let mut leaves = Vec::with_capacity(set_size);
        for index in 0..set_size {
            if index == own_index {
                leaves.push(leaf_hash(commitment.as_bytes()));
            } else {
                // Each synthetic member costs two scalar multiplications
                self.cancel.checkpoint()?;
                let member = Scalar::random_nonzero(&mut rng);
                let (member_commitment, _) = Commitment::commit_with_random(&member, &mut rng)?;
                leaves.push(leaf_hash(member_commitment.as_bytes()));
            }
        }

        let tree = MerkleTree::build(&leaves, self.membership_depth)
            .map_err(|e| StatementError::ProofGeneration(e.to_string()))?;
        let path = tree
            .path(own_index)
            .map_err(|e| StatementError::ProofGeneration(e.to_string()))?;

        debug!(
            peer = %context.peer_id,
            depth = self.membership_depth,
            set_size,
            "generating membership proof"
        );
        membership::prove(
            &identity,
            &blinding,
            &path,
            tree.root(),
            context,
            &mut rng,
            &self.cancel,
        )
    }

    /// Generate an unlinkability proof with a fresh session blinding.
    pub fn unlinkability(&self, context: &ProofContext) -> StatementResult<ZKProof> {
        let mut rng = SecureRng::new();
        let identity = identity_scalar(&context.peer_id);
        let blinding = Scalar::random_nonzero(&mut rng);
        debug!(peer = %context.peer_id, "generating unlinkability proof");
        unlinkability::prove(&identity, &blinding, context, &mut rng, &self.cancel)
    }

    /// Generate a continuity proof across two fresh commitments.
    pub fn continuity(&self, context: &ProofContext) -> StatementResult<ZKProof> {
        let mut rng = SecureRng::new();
        let identity = identity_scalar(&context.peer_id);
        let blinding_1 = Scalar::random_nonzero(&mut rng);
        let blinding_2 = Scalar::random_nonzero(&mut rng);
        debug!(peer = %context.peer_id, "generating continuity proof");
        continuity::prove(
            &identity,
            &blinding_1,
            &blinding_2,
            context,
            &mut rng,
            &self.cancel,
        )
    }

    /// Generate a plain commitment-opening proof.
    pub fn opening(&self, context: &ProofContext) -> StatementResult<ZKProof> {
        let mut rng = SecureRng::new();
        debug!(peer = %context.peer_id, "generating opening proof");
        opening::prove(context, &mut rng, &self.cancel)
    }

    /// Verify any proof through the statement registry.
    pub fn verify(&self, proof: &ZKProof) -> StatementResult<()> {
        registry::verify_proof(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> ProofBackend {
        // Depth 16 matches the registry-pinned demo profile
        ProofBackend::new()
    }

    #[test]
    fn membership_end_to_end() {
        let backend = backend();
        let proof = backend
            .membership(&ProofContext::new("peer-A", "s1"))
            .unwrap();
        backend.verify(&proof).unwrap();
    }

    #[test]
    fn unlinkability_end_to_end() {
        let backend = backend();
        let proof = backend
            .unlinkability(&ProofContext::new("peer-A", "s1"))
            .unwrap();
        backend.verify(&proof).unwrap();
    }

    #[test]
    fn continuity_end_to_end() {
        let backend = backend();
        let proof = backend
            .continuity(&ProofContext::new("peer-A", "s1"))
            .unwrap();
        backend.verify(&proof).unwrap();
    }

    #[test]
    fn opening_end_to_end() {
        let backend = backend();
        let proof = backend.opening(&ProofContext::new("peer-A", "s1")).unwrap();
        backend.verify(&proof).unwrap();
    }

    #[test]
    fn cancelled_backend_refuses_to_prove() {
        let cancel = CancelFlag::new();
        let backend = ProofBackend::new().with_cancel_flag(cancel.clone());
        cancel.cancel();
        assert_eq!(
            backend.membership(&ProofContext::new("peer-A", "s1")),
            Err(crate::StatementError::Cancelled)
        );
        assert_eq!(
            backend.continuity(&ProofContext::new("peer-A", "s1")),
            Err(crate::StatementError::Cancelled)
        );
    }

    #[test]
    fn proofs_survive_cbor_round_trip() {
        let backend = backend();
        let proof = backend
            .membership(&ProofContext::new("peer-A", "s1"))
            .unwrap();
        let bytes = proof.to_cbor().unwrap();
        let restored = ZKProof::from_cbor(&bytes).unwrap();
        backend.verify(&restored).unwrap();
    }
}

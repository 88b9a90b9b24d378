//! Anonymity-set membership statement
//!
//! Proves "I know an identity whose commitment is a leaf of the Merkle
//! anonymity set" without revealing the identity. The path itself is public
//! in this Sigma variant; privacy comes from the blinding and the size of
//! the set, not from hiding which leaf is used.

use privacyzk_commitment::Commitment;
use privacyzk_curve::{Scalar, SecureRng};
use privacyzk_merkle::{leaf_hash, verify_path, MerklePath};
use privacyzk_sigma::{CancelFlag, SchnorrProof, SchnorrWitness};
use serde::{Deserialize, Serialize};

use crate::context::ProofContext;
use crate::error::{StatementError, StatementResult};
use crate::proof::{StatementBody, ZKProof};
use crate::MEMBERSHIP_DOMAIN;

/// Public inputs of the membership statement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MembershipPublicInputs {
    /// Commitment to the prover's identity
    #[serde(rename = "c")]
    pub commitment: Commitment,
    /// Statement domain separator
    #[serde(rename = "d", with = "serde_bytes")]
    pub domain_sep: Vec<u8>,
    /// Context hash the proof is bound to
    #[serde(rename = "h", with = "serde_bytes")]
    pub ctx_hash: [u8; 32],
    /// Authentication path from the commitment's leaf to the root
    #[serde(rename = "p")]
    pub merkle_path: MerklePath,
    /// Merkle root of the anonymity set
    #[serde(rename = "r", with = "serde_bytes")]
    pub root: [u8; 32],
}

/// Membership statement: public inputs plus the PoK of opening
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MembershipStatement {
    /// Public inputs
    #[serde(rename = "i")]
    pub inputs: MembershipPublicInputs,
    /// Schnorr proof of knowledge of the commitment opening
    #[serde(rename = "k")]
    pub pok: SchnorrProof,
}

/// Generate a membership proof.
///
/// The prover re-verifies its own Merkle path before producing the PoK;
/// a leaf that is not in the tree refuses to prove rather than emitting a
/// proof that every verifier would reject. `cancel` interrupts proving at
/// the next scalar-multiplication boundary.
pub fn prove(
    identity: &Scalar,
    blinding: &Scalar,
    merkle_path: &MerklePath,
    root: &[u8; 32],
    context: &ProofContext,
    rng: &mut SecureRng,
    cancel: &CancelFlag,
) -> StatementResult<ZKProof> {
    cancel.checkpoint()?;
    let commitment = Commitment::commit(identity, blinding)?;

    let leaf = leaf_hash(commitment.as_bytes());
    if !verify_path(&leaf, merkle_path, root) {
        return Err(StatementError::BadMerklePath);
    }

    let ctx_hash = context.ctx_hash();
    let witness = SchnorrWitness::new(identity, blinding);
    let binds = [root.as_slice(), commitment.as_bytes().as_slice()];
    let pok = SchnorrProof::prove(
        &witness,
        &commitment,
        MEMBERSHIP_DOMAIN,
        &binds,
        &ctx_hash,
        rng,
        cancel,
    )?;

    let inputs = MembershipPublicInputs {
        commitment,
        domain_sep: MEMBERSHIP_DOMAIN.to_vec(),
        ctx_hash,
        merkle_path: merkle_path.clone(),
        root: *root,
    };

    Ok(ZKProof::new(
        StatementBody::Membership(MembershipStatement { inputs, pok }),
        ctx_hash,
    ))
}

/// Verify a membership statement against the envelope's context hash.
///
/// Checks, in order: metadata (domain separator, context binding, path
/// length), the Merkle path from the advertised commitment, and finally
/// the Schnorr PoK bound to root and context.
pub fn verify(
    statement: &MembershipStatement,
    envelope_ctx: &[u8; 32],
    expected_depth: Option<usize>,
) -> StatementResult<()> {
    let inputs = &statement.inputs;

    if inputs.domain_sep != MEMBERSHIP_DOMAIN {
        return Err(StatementError::BadMetadata(
            "wrong membership domain separator".into(),
        ));
    }
    if &inputs.ctx_hash != envelope_ctx {
        return Err(StatementError::BadMetadata(
            "context hash differs from envelope".into(),
        ));
    }
    if let Some(depth) = expected_depth {
        if inputs.merkle_path.len() != depth {
            return Err(StatementError::BadMerklePath);
        }
    }

    let leaf = leaf_hash(inputs.commitment.as_bytes());
    if !verify_path(&leaf, &inputs.merkle_path, &inputs.root) {
        return Err(StatementError::BadMerklePath);
    }

    let binds = [
        inputs.root.as_slice(),
        inputs.commitment.as_bytes().as_slice(),
    ];
    statement.pok.verify(
        &inputs.commitment,
        MEMBERSHIP_DOMAIN,
        &binds,
        &inputs.ctx_hash,
    )?;

    Ok(())
}

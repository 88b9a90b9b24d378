//! Session unlinkability statement
//!
//! Proves "this session commitment is correctly formed from my identity"
//! without revealing the identity or linking sessions. The contract is
//! freshness of the blinding: two sessions with the same identity but
//! independently sampled blindings yield unlinkable `(commitment, tag)`
//! pairs.

use privacyzk_commitment::Commitment;
use privacyzk_curve::{Scalar, SecureRng};
use privacyzk_sigma::{CancelFlag, SchnorrProof, SchnorrWitness};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::context::ProofContext;
use crate::error::{StatementError, StatementResult};
use crate::proof::{StatementBody, ZKProof};
use crate::{UNLINKABILITY_CHALLENGE_DOMAIN, UNLINKABILITY_DOMAIN, UNLINKABILITY_TAG_DOMAIN};

/// Public inputs of the unlinkability statement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnlinkabilityPublicInputs {
    /// Fresh session commitment
    #[serde(rename = "c")]
    pub commitment: Commitment,
    /// Statement domain separator
    #[serde(rename = "d", with = "serde_bytes")]
    pub domain_sep: Vec<u8>,
    /// Context hash the proof is bound to
    #[serde(rename = "h", with = "serde_bytes")]
    pub ctx_hash: [u8; 32],
    /// Deterministic session tag
    #[serde(rename = "t", with = "serde_bytes")]
    pub tag: [u8; 32],
}

/// Unlinkability statement: public inputs plus the PoK of opening
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnlinkabilityStatement {
    /// Public inputs
    #[serde(rename = "i")]
    pub inputs: UnlinkabilityPublicInputs,
    /// Schnorr proof of knowledge of the commitment opening
    #[serde(rename = "k")]
    pub pok: SchnorrProof,
}

/// Derive the deterministic session tag:
/// `SHA-256(tag_domain || ctx_hash || commitment)`.
///
/// Deterministic given commitment and context; with a fresh blinding per
/// session the commitment changes, so tags cannot be linked across
/// contexts.
pub fn session_tag(ctx_hash: &[u8; 32], commitment: &Commitment) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(UNLINKABILITY_TAG_DOMAIN);
    hasher.update(ctx_hash);
    hasher.update(commitment.as_bytes());
    hasher.finalize().into()
}

/// Generate an unlinkability proof with the given fresh blinding.
pub fn prove(
    identity: &Scalar,
    blinding: &Scalar,
    context: &ProofContext,
    rng: &mut SecureRng,
    cancel: &CancelFlag,
) -> StatementResult<ZKProof> {
    cancel.checkpoint()?;
    let commitment = Commitment::commit(identity, blinding)?;
    let ctx_hash = context.ctx_hash();
    let tag = session_tag(&ctx_hash, &commitment);

    let witness = SchnorrWitness::new(identity, blinding);
    let binds = [tag.as_slice(), commitment.as_bytes().as_slice()];
    let pok = SchnorrProof::prove(
        &witness,
        &commitment,
        UNLINKABILITY_CHALLENGE_DOMAIN,
        &binds,
        &ctx_hash,
        rng,
        cancel,
    )?;

    let inputs = UnlinkabilityPublicInputs {
        commitment,
        domain_sep: UNLINKABILITY_DOMAIN.to_vec(),
        ctx_hash,
        tag,
    };

    Ok(ZKProof::new(
        StatementBody::Unlinkability(UnlinkabilityStatement { inputs, pok }),
        ctx_hash,
    ))
}

/// Verify an unlinkability statement against the envelope's context hash.
///
/// Recomputes the tag from the claimed commitment and compares
/// byte-for-byte before checking the Schnorr equation.
pub fn verify(statement: &UnlinkabilityStatement, envelope_ctx: &[u8; 32]) -> StatementResult<()> {
    let inputs = &statement.inputs;

    if inputs.domain_sep != UNLINKABILITY_DOMAIN {
        return Err(StatementError::BadMetadata(
            "wrong unlinkability domain separator".into(),
        ));
    }
    if &inputs.ctx_hash != envelope_ctx {
        return Err(StatementError::BadMetadata(
            "context hash differs from envelope".into(),
        ));
    }

    let expected_tag = session_tag(&inputs.ctx_hash, &inputs.commitment);
    if expected_tag != inputs.tag {
        return Err(StatementError::TagMismatch);
    }

    let binds = [
        inputs.tag.as_slice(),
        inputs.commitment.as_bytes().as_slice(),
    ];
    statement.pok.verify(
        &inputs.commitment,
        UNLINKABILITY_CHALLENGE_DOMAIN,
        &binds,
        &inputs.ctx_hash,
    )?;

    Ok(())
}

/// Check that two verified session proofs are properly unlinkable.
///
/// Different contexts must produce different tags; the same context must
/// reproduce the same tag deterministically.
pub fn check_unlinkability(
    first: &UnlinkabilityStatement,
    second: &UnlinkabilityStatement,
) -> bool {
    if first.inputs.ctx_hash != second.inputs.ctx_hash {
        first.inputs.tag != second.inputs.tag
    } else {
        first.inputs.tag == second.inputs.tag
    }
}

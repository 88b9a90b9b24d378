//! Commitment-opening statement
//!
//! The plain proof of knowledge of a commitment opening bound to a session
//! context. It carries no anonymity-set claim of its own; the three
//! composite statements build on the same Schnorr core. Kept as a
//! standalone statement for callers that only need opening knowledge.

use privacyzk_commitment::{Commitment, Params};
use privacyzk_curve::{Scalar, SecureRng};
use privacyzk_sigma::{CancelFlag, SchnorrProof, SchnorrWitness};
use serde::{Deserialize, Serialize};

use crate::context::ProofContext;
use crate::error::{StatementError, StatementResult};
use crate::identity::identity_scalar;
use crate::proof::{StatementBody, ZKProof};
use crate::OPENING_DOMAIN;

/// Public inputs of the commitment-opening statement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpeningPublicInputs {
    /// The commitment whose opening is being proven
    #[serde(rename = "c")]
    pub commitment: Commitment,
    /// Statement domain separator
    #[serde(rename = "d", with = "serde_bytes")]
    pub domain_sep: Vec<u8>,
    /// Context hash the proof is bound to
    #[serde(rename = "h", with = "serde_bytes")]
    pub ctx_hash: [u8; 32],
}

/// Opening statement: public inputs plus the PoK
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpeningStatement {
    /// Public inputs
    #[serde(rename = "i")]
    pub inputs: OpeningPublicInputs,
    /// Schnorr proof of knowledge of the opening
    #[serde(rename = "k")]
    pub pok: SchnorrProof,
}

/// Generate an opening proof for the context's peer identity.
///
/// Derives the identity scalar from the peer id, commits under a fresh
/// blinding, and proves knowledge of the opening with the generators
/// folded into the challenge.
pub fn prove(
    context: &ProofContext,
    rng: &mut SecureRng,
    cancel: &CancelFlag,
) -> StatementResult<ZKProof> {
    let identity = identity_scalar(&context.peer_id);
    cancel.checkpoint()?;
    let (commitment, blinding) = Commitment::commit_with_random(&identity, rng)?;
    prove_with_opening(&identity, &blinding, &commitment, context, rng, cancel)
}

/// Generate an opening proof for an existing commitment and witness.
pub fn prove_with_opening(
    value: &Scalar,
    blinding: &Scalar,
    commitment: &Commitment,
    context: &ProofContext,
    rng: &mut SecureRng,
    cancel: &CancelFlag,
) -> StatementResult<ZKProof> {
    let ctx_hash = context.ctx_hash();
    let params = Params::get();
    let g_bytes = params.g().to_bytes()?;
    let h_bytes = params.h().to_bytes()?;

    let witness = SchnorrWitness::new(value, blinding);
    let binds = [
        g_bytes.as_slice(),
        h_bytes.as_slice(),
        commitment.as_bytes().as_slice(),
    ];
    let pok = SchnorrProof::prove(
        &witness,
        commitment,
        OPENING_DOMAIN,
        &binds,
        &ctx_hash,
        rng,
        cancel,
    )?;

    let inputs = OpeningPublicInputs {
        commitment: *commitment,
        domain_sep: OPENING_DOMAIN.to_vec(),
        ctx_hash,
    };

    Ok(ZKProof::new(
        StatementBody::Opening(OpeningStatement { inputs, pok }),
        ctx_hash,
    ))
}

/// Verify an opening statement against the envelope's context hash.
pub fn verify(statement: &OpeningStatement, envelope_ctx: &[u8; 32]) -> StatementResult<()> {
    let inputs = &statement.inputs;

    if inputs.domain_sep != OPENING_DOMAIN {
        return Err(StatementError::BadMetadata(
            "wrong opening domain separator".into(),
        ));
    }
    if &inputs.ctx_hash != envelope_ctx {
        return Err(StatementError::BadMetadata(
            "context hash differs from envelope".into(),
        ));
    }

    let params = Params::get();
    let g_bytes = params.g().to_bytes()?;
    let h_bytes = params.h().to_bytes()?;
    let binds = [
        g_bytes.as_slice(),
        h_bytes.as_slice(),
        inputs.commitment.as_bytes().as_slice(),
    ];
    statement
        .pok
        .verify(&inputs.commitment, OPENING_DOMAIN, &binds, &inputs.ctx_hash)?;

    Ok(())
}

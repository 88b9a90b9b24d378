//! Identity continuity statement
//!
//! Proves "the same hidden identity backs both of these commitments"
//! without revealing the identity or linking it to any public handle.
//! Built on the Chaum-Pedersen equality proof; the shared response scalar
//! is what binds the two commitments to one identity.

use privacyzk_commitment::Commitment;
use privacyzk_curve::{Scalar, SecureRng};
use privacyzk_sigma::{CancelFlag, EqualityProof, EqualityWitness};
use serde::{Deserialize, Serialize};

use crate::context::ProofContext;
use crate::error::{StatementError, StatementResult};
use crate::proof::{StatementBody, ZKProof};
use crate::{CONTINUITY_CHALLENGE_DOMAIN, CONTINUITY_DOMAIN};

/// Public inputs of the continuity statement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContinuityPublicInputs {
    /// First commitment to the shared identity
    #[serde(rename = "a")]
    pub commitment_1: Commitment,
    /// Second commitment to the shared identity
    #[serde(rename = "b")]
    pub commitment_2: Commitment,
    /// Statement domain separator
    #[serde(rename = "d", with = "serde_bytes")]
    pub domain_sep: Vec<u8>,
    /// Context hash the proof is bound to
    #[serde(rename = "h", with = "serde_bytes")]
    pub ctx_hash: [u8; 32],
}

/// Continuity statement: public inputs plus the equality PoK
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContinuityStatement {
    /// Public inputs
    #[serde(rename = "i")]
    pub inputs: ContinuityPublicInputs,
    /// Chaum-Pedersen equality proof
    #[serde(rename = "k")]
    pub pok: EqualityProof,
}

/// Generate a continuity proof for one identity under two blindings.
pub fn prove(
    identity: &Scalar,
    blinding_1: &Scalar,
    blinding_2: &Scalar,
    context: &ProofContext,
    rng: &mut SecureRng,
    cancel: &CancelFlag,
) -> StatementResult<ZKProof> {
    cancel.checkpoint()?;
    let commitment_1 = Commitment::commit(identity, blinding_1)?;
    cancel.checkpoint()?;
    let commitment_2 = Commitment::commit(identity, blinding_2)?;
    let ctx_hash = context.ctx_hash();

    let witness = EqualityWitness::new(identity, blinding_1, blinding_2);
    let pok = EqualityProof::prove(
        &witness,
        &commitment_1,
        &commitment_2,
        CONTINUITY_CHALLENGE_DOMAIN,
        &ctx_hash,
        rng,
        cancel,
    )?;

    let inputs = ContinuityPublicInputs {
        commitment_1,
        commitment_2,
        domain_sep: CONTINUITY_DOMAIN.to_vec(),
        ctx_hash,
    };

    Ok(ZKProof::new(
        StatementBody::Continuity(ContinuityStatement { inputs, pok }),
        ctx_hash,
    ))
}

/// Verify a continuity statement against the envelope's context hash.
pub fn verify(statement: &ContinuityStatement, envelope_ctx: &[u8; 32]) -> StatementResult<()> {
    let inputs = &statement.inputs;

    if inputs.domain_sep != CONTINUITY_DOMAIN {
        return Err(StatementError::BadMetadata(
            "wrong continuity domain separator".into(),
        ));
    }
    if &inputs.ctx_hash != envelope_ctx {
        return Err(StatementError::BadMetadata(
            "context hash differs from envelope".into(),
        ));
    }

    statement.pok.verify(
        &inputs.commitment_1,
        &inputs.commitment_2,
        CONTINUITY_CHALLENGE_DOMAIN,
        &inputs.ctx_hash,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::identity_scalar;

    fn unwrap_body(proof: &ZKProof) -> &ContinuityStatement {
        match &proof.body {
            StatementBody::Continuity(c) => c,
            other => panic!("wrong body: {other:?}"),
        }
    }

    #[test]
    fn prove_verify_round_trip() {
        let mut rng = SecureRng::new();
        let identity = identity_scalar("peer-A");
        let r1 = Scalar::random_nonzero(&mut rng);
        let r2 = Scalar::random_nonzero(&mut rng);
        let context = ProofContext::new("peer-A", "s1");

        let proof = prove(&identity, &r1, &r2, &context, &mut rng, &CancelFlag::new()).unwrap();
        verify(unwrap_body(&proof), &proof.context_hash).unwrap();
    }

    #[test]
    fn substituted_commitment_is_pok_rejected() {
        let mut rng = SecureRng::new();
        let identity = identity_scalar("peer-A");
        let r1 = Scalar::random_nonzero(&mut rng);
        let r2 = Scalar::random_nonzero(&mut rng);
        let context = ProofContext::new("peer-A", "s1");
        let proof = prove(&identity, &r1, &r2, &context, &mut rng, &CancelFlag::new()).unwrap();

        // Replace commitment_2 with a commitment to a different identity
        let mut statement = unwrap_body(&proof).clone();
        let stranger = identity_scalar("peer-B");
        let (c2_other, _) = Commitment::commit_with_random(&stranger, &mut rng).unwrap();
        statement.inputs.commitment_2 = c2_other;

        assert_eq!(
            verify(&statement, &proof.context_hash),
            Err(StatementError::PoKRejected)
        );
    }

    #[test]
    fn wrong_context_rejected() {
        let mut rng = SecureRng::new();
        let identity = identity_scalar("peer-A");
        let r1 = Scalar::random_nonzero(&mut rng);
        let r2 = Scalar::random_nonzero(&mut rng);
        let context = ProofContext::new("peer-A", "s1");
        let proof = prove(&identity, &r1, &r2, &context, &mut rng, &CancelFlag::new()).unwrap();

        assert!(verify(unwrap_body(&proof), &[0u8; 32]).is_err());
    }

    #[test]
    fn commitments_differ_under_distinct_blindings() {
        let mut rng = SecureRng::new();
        let identity = identity_scalar("peer-A");
        let r1 = Scalar::random_nonzero(&mut rng);
        let r2 = Scalar::random_nonzero(&mut rng);
        let context = ProofContext::new("peer-A", "s1");
        let proof = prove(&identity, &r1, &r2, &context, &mut rng, &CancelFlag::new()).unwrap();

        let statement = unwrap_body(&proof);
        assert_ne!(statement.inputs.commitment_1, statement.inputs.commitment_2);
    }
}

//! End-to-end statement tests: prove, serialize, verify, tamper

use privacyzk::prelude::*;
use privacyzk_statements::{
    unlinkability, verify_proof, StatementBody, StatementError, PROOF_SCHEMA_VERSION,
};

fn backend() -> ProofBackend {
    ProofBackend::new()
}

#[test]
fn all_statements_prove_and_verify() {
    let backend = backend();
    let context = ProofContext::new("peer-A", "s1");

    for proof in [
        backend.membership(&context).unwrap(),
        backend.continuity(&context).unwrap(),
        backend.unlinkability(&context).unwrap(),
        backend.opening(&context).unwrap(),
    ] {
        assert_eq!(proof.schema, PROOF_SCHEMA_VERSION);
        verify_proof(&proof).unwrap();
    }
}

#[test]
fn proofs_survive_the_wire_encoding() {
    let backend = backend();
    let context = ProofContext::new("peer-A", "s1");

    for proof in [
        backend.membership(&context).unwrap(),
        backend.continuity(&context).unwrap(),
        backend.unlinkability(&context).unwrap(),
    ] {
        let bytes = proof.to_cbor().unwrap();
        // Byte-stable across repeated encodes
        assert_eq!(bytes, proof.to_cbor().unwrap());

        let restored = ZKProof::from_cbor(&bytes).unwrap();
        assert_eq!(restored, proof);
        verify_proof(&restored).unwrap();
    }
}

// Scenario: a relay tampers with the membership proof by flipping the low
// bit of z_v before the client verifies locally.
#[test]
fn tampered_membership_response_is_pok_rejected() {
    let backend = backend();
    let mut proof = backend
        .membership(&ProofContext::new("peer-A", "s1"))
        .unwrap();

    match &mut proof.body {
        StatementBody::Membership(statement) => statement.pok.z_value[31] ^= 0x01,
        other => panic!("wrong body: {other:?}"),
    }

    assert_eq!(verify_proof(&proof), Err(StatementError::PoKRejected));
}

// Scenario: two unlinkability proofs by the same identity in contexts
// {session:"a"} and {session:"b"} with independent blindings.
#[test]
fn unlinkability_across_two_contexts() {
    let backend = backend();
    let ctx_a = ProofContext::new("peer-A", "a");
    let ctx_b = ProofContext::new("peer-A", "b");

    let proof_a = backend.unlinkability(&ctx_a).unwrap();
    let proof_b = backend.unlinkability(&ctx_b).unwrap();
    verify_proof(&proof_a).unwrap();
    verify_proof(&proof_b).unwrap();

    let (body_a, body_b) = match (&proof_a.body, &proof_b.body) {
        (StatementBody::Unlinkability(a), StatementBody::Unlinkability(b)) => (a, b),
        _ => panic!("wrong bodies"),
    };

    // Tags differ across contexts
    assert_ne!(body_a.inputs.tag, body_b.inputs.tag);
    assert!(unlinkability::check_unlinkability(body_a, body_b));

    // Neither proof verifies with its ctx_hash swapped for the other's
    let mut swapped_a = proof_a.clone();
    swapped_a.context_hash = proof_b.context_hash;
    assert!(verify_proof(&swapped_a).is_err());

    let mut swapped_b = proof_b.clone();
    swapped_b.context_hash = proof_a.context_hash;
    assert!(verify_proof(&swapped_b).is_err());
}

// Scenario: commitment_2 of a continuity proof is replaced by a fresh
// commitment to a different identity; the second equation fails.
#[test]
fn continuity_with_foreign_commitment_fails() {
    let backend = backend();
    let mut proof = backend
        .continuity(&ProofContext::new("peer-A", "s1"))
        .unwrap();

    let mut rng = SecureRng::new();
    let stranger = identity_scalar("peer-B");
    let (foreign, _) = Commitment::commit_with_random(&stranger, &mut rng).unwrap();

    match &mut proof.body {
        StatementBody::Continuity(statement) => statement.inputs.commitment_2 = foreign,
        other => panic!("wrong body: {other:?}"),
    }

    assert_eq!(verify_proof(&proof), Err(StatementError::PoKRejected));
}

#[test]
fn context_binding_rejects_any_other_hash() {
    let backend = backend();
    let proof = backend.opening(&ProofContext::new("peer-A", "s1")).unwrap();

    let mut tampered = proof.clone();
    tampered.context_hash = [0xaa; 32];
    match &mut tampered.body {
        StatementBody::Opening(statement) => statement.inputs.ctx_hash = [0xaa; 32],
        other => panic!("wrong body: {other:?}"),
    }
    assert_eq!(verify_proof(&tampered), Err(StatementError::PoKRejected));
}

#[test]
fn metadata_mismatch_is_refused_before_crypto() {
    let backend = backend();
    let mut proof = backend
        .unlinkability(&ProofContext::new("peer-A", "s1"))
        .unwrap();
    proof.statement_version = 7;
    assert!(matches!(
        verify_proof(&proof),
        Err(StatementError::BadMetadata(_))
    ));
}

#[test]
fn contexts_with_metadata_bind_proofs() {
    let backend = backend();
    let plain = ProofContext::new("peer-A", "s1");
    let tagged = ProofContext::new("peer-A", "s1").with_metadata("network", b"testnet".to_vec());

    let proof = backend.unlinkability(&tagged).unwrap();
    verify_proof(&proof).unwrap();
    assert_ne!(proof.context_hash, plain.ctx_hash());
}

//! Cross-crate integration tests for the crypto primitives

use privacyzk::prelude::*;
use privacyzk_commitment::{add_blindings, add_values};
use privacyzk_merkle::{leaf_hash, verify_path};
use privacyzk_sigma::{CancelFlag, EqualityWitness, SchnorrWitness};
use privacyzk_statements::identity_scalar;

#[test]
fn commitment_chain_through_sigma() {
    let mut rng = SecureRng::new();
    let identity = identity_scalar("integration-peer");
    let (commitment, blinding) = Commitment::commit_with_random(&identity, &mut rng).unwrap();

    let witness = SchnorrWitness::new(&identity, &blinding);
    let ctx_hash = [1u8; 32];
    let binds = [commitment.as_bytes().as_slice()];
    let proof = SchnorrProof::prove(
        &witness,
        &commitment,
        b"INTEGRATION_DS",
        &binds,
        &ctx_hash,
        &mut rng,
        &CancelFlag::new(),
    )
    .unwrap();

    proof
        .verify(&commitment, b"INTEGRATION_DS", &binds, &ctx_hash)
        .unwrap();
}

#[test]
fn homomorphic_sum_opens_with_combined_witness() {
    let mut rng = SecureRng::new();
    let v1 = Scalar::from(1_000u64);
    let v2 = Scalar::from(2_500u64);
    let (c1, r1) = Commitment::commit_with_random(&v1, &mut rng).unwrap();
    let (c2, r2) = Commitment::commit_with_random(&v2, &mut rng).unwrap();

    let sum = c1.add(&c2).unwrap();
    let v_sum = add_values(&v1, &v2);
    let r_sum = add_blindings(&r1, &r2);
    assert!(sum.verify(&v_sum, &r_sum));

    // The combined witness proves knowledge of the sum's opening
    let witness = SchnorrWitness::new(&v_sum, &r_sum);
    let binds = [sum.as_bytes().as_slice()];
    let proof =
        SchnorrProof::prove(&witness, &sum, b"SUM_DS", &binds, &[2u8; 32], &mut rng, &CancelFlag::new()).unwrap();
    proof.verify(&sum, b"SUM_DS", &binds, &[2u8; 32]).unwrap();
}

#[test]
fn commitments_make_merkle_leaves() {
    let mut rng = SecureRng::new();
    let mut commitments = Vec::new();
    for _ in 0..6 {
        let value = Scalar::random_nonzero(&mut rng);
        let (c, _) = Commitment::commit_with_random(&value, &mut rng).unwrap();
        commitments.push(c);
    }

    let leaves: Vec<[u8; 32]> = commitments
        .iter()
        .map(|c| leaf_hash(c.as_bytes()))
        .collect();
    let tree = MerkleTree::build(&leaves, 8).unwrap();

    for (index, leaf) in leaves.iter().enumerate() {
        let path = tree.path(index).unwrap();
        assert_eq!(path.len(), 8);
        assert!(verify_path(leaf, &path, tree.root()));
    }
}

#[test]
fn equality_proof_spans_generators() {
    let mut rng = SecureRng::new();
    let identity = identity_scalar("continuity-peer");
    let (c1, r1) = Commitment::commit_with_random(&identity, &mut rng).unwrap();
    let (c2, r2) = Commitment::commit_with_random(&identity, &mut rng).unwrap();

    let witness = EqualityWitness::new(&identity, &r1, &r2);
    let proof =
        EqualityProof::prove(&witness, &c1, &c2, b"EQ_DS", &[3u8; 32], &mut rng, &CancelFlag::new()).unwrap();
    proof.verify(&c1, &c2, b"EQ_DS", &[3u8; 32]).unwrap();
}

#[test]
fn generator_h_is_not_a_small_multiple_of_g() {
    let params = Params::get();
    let g = *params.g();
    // H must not collide with small multiples of G
    let mut accumulator = Point::identity();
    for _ in 0..64 {
        accumulator = accumulator + g;
        assert_ne!(&accumulator, params.h());
    }
}

#[test]
fn scalar_encoding_is_fixed_width() {
    let mut rng = SecureRng::new();
    for _ in 0..8 {
        let s = Scalar::random_nonzero(&mut rng);
        let bytes = s.to_bytes();
        assert_eq!(bytes.len(), 32);
        assert_eq!(Scalar::from_bytes(&bytes).unwrap(), s);
    }
}

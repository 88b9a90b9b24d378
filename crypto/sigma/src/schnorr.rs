//! Schnorr proof of knowledge of a commitment opening
//!
//! Protocol (non-interactive via Fiat-Shamir):
//!
//! 1. Sample nonces `rho_v, rho_b` uniform in `[1, q-1]`
//! 2. Announcement `A = rho_v*G + rho_b*H`
//! 3. Challenge `c = H(DS || binds... || A || ctx_hash)` mod q
//! 4. Responses `z_v = rho_v + c*v`, `z_b = rho_b + c*r` (mod q)
//!
//! The verifier recomputes the challenge, compares it to the transmitted
//! one in constant time, and checks `z_v*G + z_b*H == A + c*C` using the
//! prover-supplied challenge scalar.

use privacyzk_commitment::{Commitment, Params};
use privacyzk_curve::{Point, Scalar, SecureRng, POINT_SIZE, SCALAR_SIZE};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::cancel::CancelFlag;
use crate::error::{SigmaError, SigmaResult};
use crate::transcript::{challenge_bytes, challenge_scalar};

/// Witness for a Schnorr proof of opening.
///
/// Wiped from memory on drop; never exposed through the public API.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SchnorrWitness {
    value: [u8; SCALAR_SIZE],
    blinding: [u8; SCALAR_SIZE],
}

impl SchnorrWitness {
    /// Build a witness from its scalar parts
    pub fn new(value: &Scalar, blinding: &Scalar) -> Self {
        Self {
            value: value.to_bytes(),
            blinding: blinding.to_bytes(),
        }
    }

    fn value(&self) -> SigmaResult<Scalar> {
        Ok(Scalar::from_bytes(&self.value)?)
    }

    fn blinding(&self) -> SigmaResult<Scalar> {
        Ok(Scalar::from_bytes(&self.blinding)?)
    }
}

/// Non-interactive Schnorr proof of knowledge of `(v, r)` with
/// `C = v*G + r*H`. 129 bytes on the wire: announcement 33, challenge 32,
/// two responses of 32.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchnorrProof {
    /// Announcement `A = rho_v*G + rho_b*H`
    #[serde(with = "serde_bytes")]
    pub announcement: [u8; POINT_SIZE],
    /// Fiat-Shamir challenge bytes
    #[serde(with = "serde_bytes")]
    pub challenge: [u8; SCALAR_SIZE],
    /// Response for the value: `z_v = rho_v + c*v`
    #[serde(with = "serde_bytes")]
    pub z_value: [u8; SCALAR_SIZE],
    /// Response for the blinding: `z_b = rho_b + c*r`
    #[serde(with = "serde_bytes")]
    pub z_blinding: [u8; SCALAR_SIZE],
}

impl SchnorrProof {
    /// Generate a proof of knowledge of the opening of `commitment`.
    ///
    /// `binds` are the statement-specific public fields folded into the
    /// challenge before the announcement (e.g. the Merkle root and the
    /// commitment for membership, the session tag and the commitment for
    /// unlinkability). `ctx_hash` is always the final transcript field, so
    /// proofs cannot be replayed across contexts.
    ///
    /// `cancel` is polled before each scalar-multiplication group; a set
    /// flag abandons the proof with [`SigmaError::Cancelled`].
    pub fn prove(
        witness: &SchnorrWitness,
        commitment: &Commitment,
        domain_sep: &[u8],
        binds: &[&[u8]],
        ctx_hash: &[u8; 32],
        rng: &mut SecureRng,
        cancel: &CancelFlag,
    ) -> SigmaResult<SchnorrProof> {
        let params = Params::get();
        let value = witness.value()?;
        let blinding = witness.blinding()?;

        // Sanity: the witness must actually open the commitment
        cancel.checkpoint()?;
        if !commitment.verify(&value, &blinding) {
            return Err(SigmaError::ProveFailed(
                "witness does not open the commitment".into(),
            ));
        }

        // Nonces must be nonzero: a zero nonce turns the response into
        // c*witness, which leaks the witness by division.
        let rho_v = Scalar::random_nonzero(rng);
        let rho_b = Scalar::random_nonzero(rng);

        cancel.checkpoint()?;
        let announcement_point = params.g().mul(&rho_v) + params.h().mul(&rho_b);
        let announcement = announcement_point
            .to_bytes()
            .map_err(|e| SigmaError::ProveFailed(e.to_string()))?;

        let challenge = Self::transcript(domain_sep, binds, &announcement, ctx_hash);
        let c = challenge_scalar(&challenge);

        let z_value = (rho_v + c * value).to_bytes();
        let z_blinding = (rho_b + c * blinding).to_bytes();

        Ok(SchnorrProof {
            announcement,
            challenge,
            z_value,
            z_blinding,
        })
    }

    /// Verify the proof against `commitment` and the same transcript fields.
    ///
    /// Order of checks: decode everything, recompute the challenge and
    /// compare constant-time, then check the verification equation with the
    /// prover-supplied challenge scalar. Every failure collapses to
    /// [`SigmaError::VerifyFailed`] except malformed encodings.
    pub fn verify(
        &self,
        commitment: &Commitment,
        domain_sep: &[u8],
        binds: &[&[u8]],
        ctx_hash: &[u8; 32],
    ) -> SigmaResult<()> {
        let params = Params::get();

        let announcement = Point::from_bytes(&self.announcement)?;
        let c_point = commitment
            .to_point()
            .map_err(|e| SigmaError::BadEncoding(e.to_string()))?;
        let z_value = Scalar::from_bytes(&self.z_value)?;
        let z_blinding = Scalar::from_bytes(&self.z_blinding)?;

        let expected = Self::transcript(domain_sep, binds, &self.announcement, ctx_hash);
        if !bool::from(self.challenge.ct_eq(&expected)) {
            return Err(SigmaError::VerifyFailed);
        }

        let c = challenge_scalar(&self.challenge);
        let lhs = params.g().mul(&z_value) + params.h().mul(&z_blinding);
        let rhs = announcement + c_point.mul(&c);
        if lhs != rhs {
            return Err(SigmaError::VerifyFailed);
        }

        Ok(())
    }

    /// Honest-verifier zero-knowledge simulator.
    ///
    /// Picks `c, z_v, z_b` uniformly and derives
    /// `A = z_v*G + z_b*H - c*C`. The resulting tuple satisfies the
    /// verification equation and is distributed like an honest transcript,
    /// but its challenge is not the hash of its announcement, so it does
    /// not pass full Fiat-Shamir verification. Test support only.
    pub fn simulate(commitment: &Commitment, rng: &mut SecureRng) -> SigmaResult<SchnorrProof> {
        let params = Params::get();
        let c_point = commitment
            .to_point()
            .map_err(|e| SigmaError::BadEncoding(e.to_string()))?;

        let c = Scalar::random_nonzero(rng);
        let z_value = Scalar::random_nonzero(rng);
        let z_blinding = Scalar::random_nonzero(rng);

        let announcement_point =
            params.g().mul(&z_value) + params.h().mul(&z_blinding) - c_point.mul(&c);
        let announcement = announcement_point
            .to_bytes()
            .map_err(|e| SigmaError::ProveFailed(e.to_string()))?;

        Ok(SchnorrProof {
            announcement,
            challenge: c.to_bytes(),
            z_value: z_value.to_bytes(),
            z_blinding: z_blinding.to_bytes(),
        })
    }

    /// Check only the verification equation, with the proof's own challenge.
    ///
    /// Used by the HVZK property suite where simulated transcripts must
    /// satisfy the equation without binding to a real transcript hash.
    pub fn equation_holds(&self, commitment: &Commitment) -> SigmaResult<bool> {
        let params = Params::get();
        let announcement = Point::from_bytes(&self.announcement)?;
        let c_point = commitment
            .to_point()
            .map_err(|e| SigmaError::BadEncoding(e.to_string()))?;
        let z_value = Scalar::from_bytes(&self.z_value)?;
        let z_blinding = Scalar::from_bytes(&self.z_blinding)?;
        let c = challenge_scalar(&self.challenge);

        let lhs = params.g().mul(&z_value) + params.h().mul(&z_blinding);
        let rhs = announcement + c_point.mul(&c);
        Ok(lhs == rhs)
    }

    fn transcript(
        domain_sep: &[u8],
        binds: &[&[u8]],
        announcement: &[u8; POINT_SIZE],
        ctx_hash: &[u8; 32],
    ) -> [u8; 32] {
        let mut parts: Vec<&[u8]> = Vec::with_capacity(binds.len() + 2);
        parts.extend_from_slice(binds);
        parts.push(announcement);
        parts.push(ctx_hash);
        challenge_bytes(domain_sep, &parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DS: &[u8] = b"SCHNORR_TEST_V1";

    fn setup() -> (SchnorrWitness, Commitment, [u8; 32], SecureRng) {
        let mut rng = SecureRng::new();
        let value = Scalar::random_nonzero(&mut rng);
        let (commitment, blinding) = Commitment::commit_with_random(&value, &mut rng).unwrap();
        let witness = SchnorrWitness::new(&value, &blinding);
        let ctx_hash = [7u8; 32];
        (witness, commitment, ctx_hash, rng)
    }

    #[test]
    fn prove_verify_round_trip() {
        let (witness, commitment, ctx_hash, mut rng) = setup();
        let binds = [commitment.as_bytes().as_slice()];
        let proof =
            SchnorrProof::prove(&witness, &commitment, DS, &binds, &ctx_hash, &mut rng, &CancelFlag::new()).unwrap();
        proof.verify(&commitment, DS, &binds, &ctx_hash).unwrap();
    }

    #[test]
    fn wrong_context_rejected() {
        let (witness, commitment, ctx_hash, mut rng) = setup();
        let binds = [commitment.as_bytes().as_slice()];
        let proof =
            SchnorrProof::prove(&witness, &commitment, DS, &binds, &ctx_hash, &mut rng, &CancelFlag::new()).unwrap();

        let other_ctx = [8u8; 32];
        assert_eq!(
            proof.verify(&commitment, DS, &binds, &other_ctx),
            Err(SigmaError::VerifyFailed)
        );
    }

    #[test]
    fn wrong_domain_rejected() {
        let (witness, commitment, ctx_hash, mut rng) = setup();
        let binds = [commitment.as_bytes().as_slice()];
        let proof =
            SchnorrProof::prove(&witness, &commitment, DS, &binds, &ctx_hash, &mut rng, &CancelFlag::new()).unwrap();

        assert!(proof
            .verify(&commitment, b"OTHER_DS", &binds, &ctx_hash)
            .is_err());
    }

    #[test]
    fn tampered_response_rejected() {
        let (witness, commitment, ctx_hash, mut rng) = setup();
        let binds = [commitment.as_bytes().as_slice()];
        let mut proof =
            SchnorrProof::prove(&witness, &commitment, DS, &binds, &ctx_hash, &mut rng, &CancelFlag::new()).unwrap();

        proof.z_value[31] ^= 0x01;
        assert!(proof.verify(&commitment, DS, &binds, &ctx_hash).is_err());
    }

    #[test]
    fn tampered_challenge_rejected() {
        let (witness, commitment, ctx_hash, mut rng) = setup();
        let binds = [commitment.as_bytes().as_slice()];
        let mut proof =
            SchnorrProof::prove(&witness, &commitment, DS, &binds, &ctx_hash, &mut rng, &CancelFlag::new()).unwrap();

        proof.challenge[0] ^= 0x80;
        assert!(proof.verify(&commitment, DS, &binds, &ctx_hash).is_err());
    }

    #[test]
    fn proof_for_other_commitment_rejected() {
        let (witness, commitment, ctx_hash, mut rng) = setup();
        let binds = [commitment.as_bytes().as_slice()];
        let proof =
            SchnorrProof::prove(&witness, &commitment, DS, &binds, &ctx_hash, &mut rng, &CancelFlag::new()).unwrap();

        let other_value = Scalar::random_nonzero(&mut rng);
        let (other_commitment, _) =
            Commitment::commit_with_random(&other_value, &mut rng).unwrap();
        assert!(proof
            .verify(&other_commitment, DS, &binds, &ctx_hash)
            .is_err());
    }

    #[test]
    fn mismatched_witness_refuses_to_prove() {
        let (_, commitment, ctx_hash, mut rng) = setup();
        let bogus = SchnorrWitness::new(
            &Scalar::random_nonzero(&mut rng),
            &Scalar::random_nonzero(&mut rng),
        );
        let binds = [commitment.as_bytes().as_slice()];
        assert!(
            SchnorrProof::prove(&bogus, &commitment, DS, &binds, &ctx_hash, &mut rng, &CancelFlag::new()).is_err()
        );
    }

    #[test]
    fn announcements_are_fresh_per_proof() {
        let (witness, commitment, ctx_hash, mut rng) = setup();
        let binds = [commitment.as_bytes().as_slice()];
        let p1 =
            SchnorrProof::prove(&witness, &commitment, DS, &binds, &ctx_hash, &mut rng, &CancelFlag::new()).unwrap();
        let p2 =
            SchnorrProof::prove(&witness, &commitment, DS, &binds, &ctx_hash, &mut rng, &CancelFlag::new()).unwrap();
        assert_ne!(p1.announcement, p2.announcement);
    }

    #[test]
    fn cancelled_flag_abandons_proving() {
        let (witness, commitment, ctx_hash, mut rng) = setup();
        let binds = [commitment.as_bytes().as_slice()];
        let cancel = CancelFlag::new();
        cancel.cancel();
        assert_eq!(
            SchnorrProof::prove(&witness, &commitment, DS, &binds, &ctx_hash, &mut rng, &cancel),
            Err(SigmaError::Cancelled)
        );
    }

    #[test]
    fn simulated_transcript_satisfies_equation() {
        let (_, commitment, _, mut rng) = setup();
        let simulated = SchnorrProof::simulate(&commitment, &mut rng).unwrap();
        assert!(simulated.equation_holds(&commitment).unwrap());
        // But it does not pass full verification: the challenge is not the
        // hash of the announcement.
        let binds = [commitment.as_bytes().as_slice()];
        assert!(simulated
            .verify(&commitment, DS, &binds, &[7u8; 32])
            .is_err());
    }
}

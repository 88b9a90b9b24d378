//! Chaum-Pedersen equality proof for two Pedersen commitments
//!
//! Proves that `C1 = id*G + r1*H` and `C2 = id*G + r2*H` share the hidden
//! scalar `id` without revealing `id`, `r1`, or `r2`.
//!
//! Protocol:
//!
//! 1. Sample nonces `k_id, k_1, k_2` uniform in `[1, q-1]`
//! 2. Announcements `A1 = k_id*G + k_1*H`, `A2 = k_id*G + k_2*H`
//!    (the shared `k_id` is what ties the two equations together)
//! 3. Challenge `c = H(DS || C1 || C2 || A1 || A2 || ctx_hash)` mod q
//! 4. Responses `z_id = k_id + c*id`, `z_1 = k_1 + c*r1`, `z_2 = k_2 + c*r2`
//!
//! Verification checks both `z_id*G + z_1*H == A1 + c*C1` and
//! `z_id*G + z_2*H == A2 + c*C2`; the shared `z_id` binds the commitments
//! to a common scalar.

use privacyzk_commitment::{Commitment, Params};
use privacyzk_curve::{Point, Scalar, SecureRng, POINT_SIZE, SCALAR_SIZE};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::cancel::CancelFlag;
use crate::error::{SigmaError, SigmaResult};
use crate::transcript::{challenge_bytes, challenge_scalar};

/// Witness for an equality proof: the shared identity scalar and the two
/// blindings. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EqualityWitness {
    identity: [u8; SCALAR_SIZE],
    blinding_1: [u8; SCALAR_SIZE],
    blinding_2: [u8; SCALAR_SIZE],
}

impl EqualityWitness {
    /// Build a witness from its scalar parts
    pub fn new(identity: &Scalar, blinding_1: &Scalar, blinding_2: &Scalar) -> Self {
        Self {
            identity: identity.to_bytes(),
            blinding_1: blinding_1.to_bytes(),
            blinding_2: blinding_2.to_bytes(),
        }
    }

    fn parts(&self) -> SigmaResult<(Scalar, Scalar, Scalar)> {
        Ok((
            Scalar::from_bytes(&self.identity)?,
            Scalar::from_bytes(&self.blinding_1)?,
            Scalar::from_bytes(&self.blinding_2)?,
        ))
    }
}

/// Non-interactive Chaum-Pedersen equality proof. Two announcements, one
/// challenge, three responses: 194 bytes on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualityProof {
    /// `A1 = k_id*G + k_1*H`
    #[serde(with = "serde_bytes")]
    pub announcement_1: [u8; POINT_SIZE],
    /// `A2 = k_id*G + k_2*H`
    #[serde(with = "serde_bytes")]
    pub announcement_2: [u8; POINT_SIZE],
    /// Fiat-Shamir challenge bytes
    #[serde(with = "serde_bytes")]
    pub challenge: [u8; SCALAR_SIZE],
    /// Shared response `z_id = k_id + c*id`
    #[serde(with = "serde_bytes")]
    pub z_identity: [u8; SCALAR_SIZE],
    /// `z_1 = k_1 + c*r1`
    #[serde(with = "serde_bytes")]
    pub z_blinding_1: [u8; SCALAR_SIZE],
    /// `z_2 = k_2 + c*r2`
    #[serde(with = "serde_bytes")]
    pub z_blinding_2: [u8; SCALAR_SIZE],
}

impl EqualityProof {
    /// Prove that `c1` and `c2` commit to the same hidden scalar.
    ///
    /// `cancel` is polled before each scalar-multiplication group; a set
    /// flag abandons the proof with [`SigmaError::Cancelled`].
    pub fn prove(
        witness: &EqualityWitness,
        c1: &Commitment,
        c2: &Commitment,
        domain_sep: &[u8],
        ctx_hash: &[u8; 32],
        rng: &mut SecureRng,
        cancel: &CancelFlag,
    ) -> SigmaResult<EqualityProof> {
        let params = Params::get();
        let (identity, blinding_1, blinding_2) = witness.parts()?;

        // Sanity: the witness must open both commitments
        cancel.checkpoint()?;
        if !c1.verify(&identity, &blinding_1) || !c2.verify(&identity, &blinding_2) {
            return Err(SigmaError::ProveFailed(
                "witness does not open both commitments".into(),
            ));
        }

        let k_id = Scalar::random_nonzero(rng);
        let k_1 = Scalar::random_nonzero(rng);
        let k_2 = Scalar::random_nonzero(rng);

        cancel.checkpoint()?;
        let a1 = (params.g().mul(&k_id) + params.h().mul(&k_1))
            .to_bytes()
            .map_err(|e| SigmaError::ProveFailed(e.to_string()))?;
        cancel.checkpoint()?;
        let a2 = (params.g().mul(&k_id) + params.h().mul(&k_2))
            .to_bytes()
            .map_err(|e| SigmaError::ProveFailed(e.to_string()))?;

        let challenge = Self::transcript(domain_sep, c1, c2, &a1, &a2, ctx_hash);
        let c = challenge_scalar(&challenge);

        Ok(EqualityProof {
            announcement_1: a1,
            announcement_2: a2,
            challenge,
            z_identity: (k_id + c * identity).to_bytes(),
            z_blinding_1: (k_1 + c * blinding_1).to_bytes(),
            z_blinding_2: (k_2 + c * blinding_2).to_bytes(),
        })
    }

    /// Verify both equations and the challenge binding.
    pub fn verify(
        &self,
        c1: &Commitment,
        c2: &Commitment,
        domain_sep: &[u8],
        ctx_hash: &[u8; 32],
    ) -> SigmaResult<()> {
        let params = Params::get();

        let a1 = Point::from_bytes(&self.announcement_1)?;
        let a2 = Point::from_bytes(&self.announcement_2)?;
        let c1_point = c1
            .to_point()
            .map_err(|e| SigmaError::BadEncoding(e.to_string()))?;
        let c2_point = c2
            .to_point()
            .map_err(|e| SigmaError::BadEncoding(e.to_string()))?;
        let z_identity = Scalar::from_bytes(&self.z_identity)?;
        let z_1 = Scalar::from_bytes(&self.z_blinding_1)?;
        let z_2 = Scalar::from_bytes(&self.z_blinding_2)?;

        let expected = Self::transcript(
            domain_sep,
            c1,
            c2,
            &self.announcement_1,
            &self.announcement_2,
            ctx_hash,
        );
        if !bool::from(self.challenge.ct_eq(&expected)) {
            return Err(SigmaError::VerifyFailed);
        }

        let c = challenge_scalar(&self.challenge);

        // Equation 1: z_id*G + z_1*H == A1 + c*C1
        let lhs1 = params.g().mul(&z_identity) + params.h().mul(&z_1);
        let rhs1 = a1 + c1_point.mul(&c);
        if lhs1 != rhs1 {
            return Err(SigmaError::VerifyFailed);
        }

        // Equation 2: z_id*G + z_2*H == A2 + c*C2
        let lhs2 = params.g().mul(&z_identity) + params.h().mul(&z_2);
        let rhs2 = a2 + c2_point.mul(&c);
        if lhs2 != rhs2 {
            return Err(SigmaError::VerifyFailed);
        }

        Ok(())
    }

    fn transcript(
        domain_sep: &[u8],
        c1: &Commitment,
        c2: &Commitment,
        a1: &[u8; POINT_SIZE],
        a2: &[u8; POINT_SIZE],
        ctx_hash: &[u8; 32],
    ) -> [u8; 32] {
        challenge_bytes(
            domain_sep,
            &[c1.as_bytes(), c2.as_bytes(), a1, a2, ctx_hash],
        )
    }

    /// Extract the shared identity scalar from two proofs over the same
    /// commitments and announcements but different challenges.
    ///
    /// Demonstrates special soundness: `id = (z_id - z_id') / (c - c')`.
    /// Only succeeds when a prover reused nonces; test support.
    pub fn extract_identity(p1: &EqualityProof, p2: &EqualityProof) -> SigmaResult<Scalar> {
        if p1.announcement_1 != p2.announcement_1 || p1.announcement_2 != p2.announcement_2 {
            return Err(SigmaError::ProveFailed("announcements differ".into()));
        }

        let c1 = challenge_scalar(&p1.challenge);
        let c2 = challenge_scalar(&p2.challenge);
        let z1 = Scalar::from_bytes(&p1.z_identity)?;
        let z2 = Scalar::from_bytes(&p2.z_identity)?;

        let denominator = c1 - c2;
        if denominator.is_zero() {
            return Err(SigmaError::ProveFailed("challenges are equal".into()));
        }

        Ok((z1 - z2) * denominator.invert()?)
    }
}

//! Pedersen commitment operations

use privacyzk_curve::{Point, Scalar, SecureRng, POINT_SIZE, SCALAR_SIZE};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CommitmentError, CommitmentResult};
use crate::params::Params;

/// A Pedersen commitment `C = v*G + r*H`, stored in SEC1 compressed form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(#[serde(with = "serde_bytes")] [u8; POINT_SIZE]);

/// Opening `(value, blinding)` for a commitment.
///
/// Holds witness material; both fields are wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Opening {
    value: [u8; SCALAR_SIZE],
    blinding: [u8; SCALAR_SIZE],
}

impl Opening {
    /// Build an opening from its scalar parts
    pub fn new(value: &Scalar, blinding: &Scalar) -> Self {
        Self {
            value: value.to_bytes(),
            blinding: blinding.to_bytes(),
        }
    }

    /// The committed value
    pub fn value(&self) -> CommitmentResult<Scalar> {
        Ok(Scalar::from_bytes(&self.value)?)
    }

    /// The blinding factor
    pub fn blinding(&self) -> CommitmentResult<Scalar> {
        Ok(Scalar::from_bytes(&self.blinding)?)
    }
}

impl Commitment {
    /// Commit to `value` under a specific blinding: `C = value*G + blinding*H`.
    ///
    /// Rejects the identity point; it is the `(0, 0)` opening and would
    /// reveal the committed value trivially.
    pub fn commit(value: &Scalar, blinding: &Scalar) -> CommitmentResult<Commitment> {
        let params = Params::get();
        let point = params.g().mul(value) + params.h().mul(blinding);
        if point.is_identity() {
            return Err(CommitmentError::IdentityCommitment);
        }
        Ok(Commitment(point.to_bytes()?))
    }

    /// Commit to `value` under a fresh uniformly random blinding in `[1, q-1]`.
    pub fn commit_with_random(
        value: &Scalar,
        rng: &mut SecureRng,
    ) -> CommitmentResult<(Commitment, Scalar)> {
        let blinding = Scalar::random_nonzero(rng);
        let commitment = Self::commit(value, &blinding)?;
        Ok((commitment, blinding))
    }

    /// Verify an opening: recompute `value*G + blinding*H` and compare.
    ///
    /// Lenient modulo the group order: scalars are field elements, so
    /// openings produced by homomorphic sums verify after reduction.
    /// Returns `false` for malformed commitment bytes rather than erroring.
    pub fn verify(&self, value: &Scalar, blinding: &Scalar) -> bool {
        let params = Params::get();
        let expected = params.g().mul(value) + params.h().mul(blinding);
        match Point::from_bytes(&self.0) {
            Ok(stored) => stored == expected,
            Err(_) => false,
        }
    }

    /// Verify a held opening
    pub fn verify_opening(&self, opening: &Opening) -> bool {
        match (opening.value(), opening.blinding()) {
            (Ok(value), Ok(blinding)) => self.verify(&value, &blinding),
            _ => false,
        }
    }

    /// Homomorphic addition: `C1 + C2` commits to `(v1+v2, r1+r2)` mod q.
    pub fn add(&self, other: &Commitment) -> CommitmentResult<Commitment> {
        let sum = self.to_point()? + other.to_point()?;
        if sum.is_identity() {
            return Err(CommitmentError::IdentityCommitment);
        }
        Ok(Commitment(sum.to_bytes()?))
    }

    /// Decode the underlying curve point with full validation
    pub fn to_point(&self) -> CommitmentResult<Point> {
        Ok(Point::from_bytes(&self.0)?)
    }

    /// Wrap validated bytes as a commitment
    pub fn from_bytes(bytes: &[u8]) -> CommitmentResult<Commitment> {
        let point = Point::from_bytes(bytes)
            .map_err(|e| CommitmentError::InvalidCommitment(e.to_string()))?;
        Ok(Commitment(point.to_bytes()?))
    }

    /// The SEC1 compressed encoding
    pub fn as_bytes(&self) -> &[u8; POINT_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Commitment({})", hex::encode(self.0))
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Add committed values modulo the group order
pub fn add_values(v1: &Scalar, v2: &Scalar) -> Scalar {
    *v1 + *v2
}

/// Add blinding factors modulo the group order
pub fn add_blindings(r1: &Scalar, r2: &Scalar) -> Scalar {
    *r1 + *r2
}

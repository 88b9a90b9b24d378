//! Curve points with SEC1 compressed encoding

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{EncodedPoint, ProjectivePoint};
use sha2::{Digest, Sha256};
use std::ops::{Add, Neg, Sub};

use crate::error::{CurveError, CurveResult};
use crate::scalar::Scalar;
use crate::POINT_SIZE;

/// Maximum try-and-increment attempts before giving up. Each attempt
/// succeeds with probability ~1/2, so 256 misses is unreachable in practice.
const HASH_TO_POINT_MAX_ATTEMPTS: u32 = 256;

/// Affine secp256k1 point (or the point at infinity).
///
/// Encoding is SEC1 compressed: 33 bytes, `0x02|0x03 || x`. The identity
/// point has no compressed encoding and is rejected on both encode and
/// decode. secp256k1 is a prime-order curve (cofactor 1), so every on-curve
/// point is in the prime-order subgroup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point(ProjectivePoint);

impl Point {
    /// The standard secp256k1 base point `G`
    pub fn generator() -> Self {
        Point(ProjectivePoint::GENERATOR)
    }

    /// The point at infinity
    pub fn identity() -> Self {
        Point(ProjectivePoint::IDENTITY)
    }

    /// Decode a SEC1 compressed point with full validation.
    ///
    /// Rejects wrong lengths, bad prefixes, off-curve x-coordinates, and
    /// the identity encoding.
    pub fn from_bytes(bytes: &[u8]) -> CurveResult<Self> {
        if bytes.len() != POINT_SIZE {
            return Err(CurveError::InvalidPoint(format!(
                "expected {} bytes, got {}",
                POINT_SIZE,
                bytes.len()
            )));
        }
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(CurveError::InvalidPoint(format!(
                "bad compressed prefix 0x{:02x}",
                bytes[0]
            )));
        }

        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|e| CurveError::InvalidPoint(format!("bad encoding: {e}")))?;
        let point: Option<ProjectivePoint> = ProjectivePoint::from_encoded_point(&encoded).into();
        let point = point.ok_or_else(|| CurveError::InvalidPoint("not on curve".into()))?;

        Ok(Point(point))
    }

    /// Encode as SEC1 compressed bytes.
    ///
    /// The identity point has no compressed encoding and is an error.
    pub fn to_bytes(&self) -> CurveResult<[u8; POINT_SIZE]> {
        if self.is_identity() {
            return Err(CurveError::IdentityPoint);
        }
        let encoded = self.0.to_affine().to_encoded_point(true);
        let bytes = encoded.as_bytes();
        let mut out = [0u8; POINT_SIZE];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Whether this is the point at infinity
    pub fn is_identity(&self) -> bool {
        self.0.is_identity().into()
    }

    /// Scalar multiplication `k * P`
    pub fn mul(&self, k: &Scalar) -> Point {
        Point(self.0 * *k.inner())
    }

    /// Derive a generator from a domain tag by try-and-increment.
    ///
    /// Hashes `tag || counter_be32` with SHA-256 and interprets the digest
    /// as a compressed x-coordinate (even-y prefix) until a valid point
    /// appears. The derivation is deterministic and publicly recomputable;
    /// nobody learns a discrete log of the result relative to `G`. Constant
    /// time is not required: the output is public.
    pub fn hash_to_point(tag: &[u8]) -> CurveResult<Self> {
        for counter in 0..HASH_TO_POINT_MAX_ATTEMPTS {
            let mut hasher = Sha256::new();
            hasher.update(tag);
            hasher.update(counter.to_be_bytes());
            let digest = hasher.finalize();

            let mut candidate = [0u8; POINT_SIZE];
            candidate[0] = 0x02;
            candidate[1..].copy_from_slice(&digest);

            if let Ok(point) = Point::from_bytes(&candidate) {
                return Ok(point);
            }
        }
        Err(CurveError::HashToCurveExhausted(HASH_TO_POINT_MAX_ATTEMPTS))
    }

    pub(crate) fn inner(&self) -> &ProjectivePoint {
        &self.0
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point(self.0 - rhs.0)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point(-self.0)
    }
}

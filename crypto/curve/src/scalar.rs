//! Field scalars modulo the secp256k1 group order

use k256::elliptic_curve::{ops::Reduce, Field, PrimeField};
use k256::{FieldBytes, U256};
use rand_core::{CryptoRng, RngCore};
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{CurveError, CurveResult};
use crate::SCALAR_SIZE;

/// Element of the secp256k1 scalar field.
///
/// Encoding is 32-byte big-endian. All arithmetic is modulo the group
/// order `q`; zero is a valid scalar but callers must reject it in roles
/// where a zero would leak a witness (nonces, challenges).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scalar(k256::Scalar);

impl Scalar {
    /// The zero scalar
    pub const ZERO: Scalar = Scalar(k256::Scalar::ZERO);

    /// The one scalar
    pub const ONE: Scalar = Scalar(k256::Scalar::ONE);

    /// Decode a canonical 32-byte big-endian scalar.
    ///
    /// Rejects encodings that are not reduced modulo `q`.
    pub fn from_bytes(bytes: &[u8; SCALAR_SIZE]) -> CurveResult<Self> {
        let repr = *FieldBytes::from_slice(bytes);
        let inner: Option<k256::Scalar> = k256::Scalar::from_repr(repr).into();
        inner
            .map(Scalar)
            .ok_or_else(|| CurveError::InvalidScalar("not a canonical field element".into()))
    }

    /// Interpret arbitrary 32 bytes as a scalar with modular reduction.
    ///
    /// Used for hash outputs (Fiat-Shamir challenges, identity scalars)
    /// where the input is uniform over 2^256 rather than over `q`.
    pub fn reduce_bytes(bytes: &[u8; SCALAR_SIZE]) -> Self {
        let repr = FieldBytes::from_slice(bytes);
        Scalar(<k256::Scalar as Reduce<U256>>::reduce_bytes(repr))
    }

    /// Encode as 32-byte big-endian, zero-padded
    pub fn to_bytes(&self) -> [u8; SCALAR_SIZE] {
        self.0.to_bytes().into()
    }

    /// Sample a uniformly random scalar in `[0, q-1]`
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        Scalar(k256::Scalar::random(rng))
    }

    /// Sample a uniformly random scalar in `[1, q-1]`.
    ///
    /// Resamples on zero; required for nonces and blindings where a zero
    /// scalar would leak the witness through the response equation.
    pub fn random_nonzero(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        loop {
            let candidate = Self::random(rng);
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }

    /// Whether this is the zero scalar
    pub fn is_zero(&self) -> bool {
        self.0.is_zero().into()
    }

    /// Multiplicative inverse, or an error for zero
    pub fn invert(&self) -> CurveResult<Self> {
        let inner: Option<k256::Scalar> = self.0.invert().into();
        inner
            .map(Scalar)
            .ok_or_else(|| CurveError::InvalidScalar("zero has no inverse".into()))
    }

    pub(crate) fn inner(&self) -> &k256::Scalar {
        &self.0
    }
}

impl Add for Scalar {
    type Output = Scalar;

    fn add(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 + rhs.0)
    }
}

impl Sub for Scalar {
    type Output = Scalar;

    fn sub(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 - rhs.0)
    }
}

impl Mul for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 * rhs.0)
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        Scalar(-self.0)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar(k256::Scalar::from(value))
    }
}

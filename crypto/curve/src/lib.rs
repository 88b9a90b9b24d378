//! PRIVACYZK Curve Primitives
//!
//! secp256k1 scalar and point arithmetic for the proof backends.
//!
//! - **Scalar**: field element mod the group order `q`, 32-byte big-endian
//!   encoding, modular arithmetic
//! - **Point**: curve point with SEC1 compressed (33-byte) encoding, full
//!   on-curve validation on decode
//! - **Hash-to-curve**: try-and-increment derivation of the second Pedersen
//!   generator `H` from a fixed domain tag
//! - **SecureRng**: fork-safe wrapper over the OS CSPRNG
//!
//! All higher layers (commitments, Sigma proofs, statements) go through these
//! wrappers rather than touching `k256` directly.

pub mod error;
pub mod point;
pub mod rng;
pub mod scalar;

pub use error::{CurveError, CurveResult};
pub use point::Point;
pub use rng::SecureRng;
pub use scalar::Scalar;

/// Size of an encoded scalar in bytes (32-byte big-endian).
pub const SCALAR_SIZE: usize = 32;

/// Size of a SEC1 compressed point in bytes.
pub const POINT_SIZE: usize = 33;

/// Domain tag for deriving the second Pedersen generator.
pub const GENERATOR_H_TAG: &[u8] = b"PEDERSEN_H_GEN_V1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert_eq!(SCALAR_SIZE, 32);
        assert_eq!(POINT_SIZE, 33);
        assert!(!GENERATOR_H_TAG.is_empty());
    }
}

//! Length-prefixed Fiat-Shamir challenge computation

use privacyzk_curve::Scalar;
use sha2::{Digest, Sha256};

/// Compute a 32-byte Fiat-Shamir challenge.
///
/// `SHA-256(lp(domain_sep) || lp(part_0) || ... || lp(part_n))` where
/// `lp(x) = len(x) as u32 big-endian || x`. Without the length prefixes,
/// `H(a || b)` and `H(a' || b')` collide whenever the field boundary
/// shifts; with them every field is framed unambiguously.
///
/// Callers append the announcement(s) and the context hash as the final
/// parts so the challenge binds the full transcript.
pub fn challenge_bytes(domain_sep: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    update_prefixed(&mut hasher, domain_sep);
    for part in parts {
        update_prefixed(&mut hasher, part);
    }
    hasher.finalize().into()
}

/// Reduce a 32-byte challenge to a scalar modulo the group order
pub fn challenge_scalar(bytes: &[u8; 32]) -> Scalar {
    Scalar::reduce_bytes(bytes)
}

fn update_prefixed(hasher: &mut Sha256, field: &[u8]) {
    hasher.update((field.len() as u32).to_be_bytes());
    hasher.update(field);
}

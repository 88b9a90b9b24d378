//! Identity scalar derivation

use privacyzk_curve::Scalar;
use sha2::{Digest, Sha256};

/// Domain tag for peer-id to scalar derivation
pub const PEER_ID_SCALAR_DOMAIN: &[u8] = b"LIBP2P_PRIVACY_PEER_ID_SCALAR_V1";

/// Derive the identity scalar for a peer id.
///
/// `id = SHA-256(domain || peer_id_utf8) mod q`. Purely deterministic and
/// peer-id-indexed; the derivation provides no anonymity by itself —
/// anonymity comes from the blinding factor and the size of the Merkle
/// anonymity set.
pub fn identity_scalar(peer_id: &str) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(PEER_ID_SCALAR_DOMAIN);
    hasher.update(peer_id.as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    Scalar::reduce_bytes(&digest)
}

//! Keccak-256 hashing for personal messages and addresses.

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};

const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Hashes a message the way `personal_sign` does (EIP-191 version `0x45`).
///
/// The digest covers the prefix, the decimal byte length of the message and
/// the message itself.
#[must_use]
pub fn hash_message(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Derives the `0x`-prefixed, lower-case address of a public key.
///
/// The address is the last 20 bytes of the Keccak-256 digest of the
/// uncompressed point without its `0x04` tag.
#[must_use]
pub fn address_of(key: &VerifyingKey) -> String {
    let point = key.as_affine().to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&digest[12..]))
}

//! Error types for Ethereum key handling.

use thiserror::Error;

/// Errors that can occur while loading an account key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The key text is not hex encoded.
    #[error("private key must be hex encoded: {reason}")]
    InvalidHex {
        /// Decoder message
        reason: String,
    },
    /// The bytes are not a valid secp256k1 scalar.
    #[error("invalid secp256k1 private key: expected 32 bytes in 1..n, got {length} bytes")]
    InvalidKey {
        /// Number of bytes supplied
        length: usize,
    },
}

//! Nonce generation.

use rand::Rng;

use crate::constants::NONCE_UPPER_BOUND;

/// Draws nonces for new tokens.
///
/// Nonces are embedded in the signed message only; nothing in this crate
/// records or checks them afterwards.
pub trait NonceSource: Send + Sync {
    /// Returns a nonce in `0..NONCE_UPPER_BOUND`.
    fn next_nonce(&self) -> u64;
}

/// Nonces from the thread-local random generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNonce;

impl NonceSource for RandomNonce {
    fn next_nonce(&self) -> u64 {
        rand::thread_rng().gen_range(0..NONCE_UPPER_BOUND)
    }
}

/// A nonce source that always returns the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedNonce(pub u64);

impl NonceSource for FixedNonce {
    fn next_nonce(&self) -> u64 {
        self.0
    }
}

//! Boundary traits for the account signing capability.
//!
//! The crate never handles key material. Producing a signature over the
//! canonical message, and recovering the signer's address from one, are
//! delegated to implementations of these traits (a wallet, a hardware
//! device, or the `web3-token-eth` crate).

use crate::error::SigningError;

/// Signs canonical message text on behalf of an account.
///
/// Closures of the form `Fn(&str) -> Result<String, SigningError>` implement
/// this trait, so a wallet callback can be passed directly.
///
/// # Example
///
/// ```
/// use web3_token::{MessageSigner, SigningError};
///
/// let signer = |message: &str| -> Result<String, SigningError> {
///     Ok(format!("0x{}", "ab".repeat(message.len().min(65))))
/// };
/// assert!(signer.sign_message("hello").unwrap().starts_with("0x"));
/// ```
pub trait MessageSigner {
    /// Returns the signature over `message` as a hex string (optionally `0x`-prefixed).
    ///
    /// # Errors
    ///
    /// Returns `SigningError` if the capability cannot produce a signature.
    fn sign_message(&self, message: &str) -> Result<String, SigningError>;
}

impl<F> MessageSigner for F
where
    F: Fn(&str) -> Result<String, SigningError>,
{
    fn sign_message(&self, message: &str) -> Result<String, SigningError> {
        self(message)
    }
}

/// Recovers the address that signed a message.
pub trait AddressRecovery {
    /// Returns the signer's address for `message` and raw `signature` bytes.
    ///
    /// # Errors
    ///
    /// Returns `SigningError` if the signature is malformed or recovery fails.
    fn recover_address(&self, message: &str, signature: &[u8]) -> Result<String, SigningError>;
}

impl<T: AddressRecovery + ?Sized> AddressRecovery for &T {
    fn recover_address(&self, message: &str, signature: &[u8]) -> Result<String, SigningError> {
        (**self).recover_address(message, signature)
    }
}

//! Ethereum account backed by a secp256k1 private key.

use std::fmt;

use k256::ecdsa::SigningKey;
use tracing::trace;
use web3_token::{MessageSigner, SigningError};

use crate::error::KeyError;
use crate::hash::{address_of, hash_message};

/// Offset added to the recovery id in the trailing `v` byte.
const V_OFFSET: u8 = 27;

/// An Ethereum account that signs messages with `personal_sign` semantics.
///
/// Signatures are 65 bytes, `r || s || v` with `v = 27 + recovery id`,
/// rendered as `0x`-prefixed lower-case hex. Signing is deterministic
/// (RFC 6979).
///
/// # Example
///
/// ```
/// use web3_token::{sign, verify, SignOptions, VerifyOptions};
/// use web3_token_eth::{EthAccount, EthRecovery};
///
/// let account = EthAccount::generate();
/// let token = sign(&account, &SignOptions::new().domain("iq.wiki"))?;
///
/// let verified = verify(&token, &EthRecovery, &VerifyOptions::new().domain("iq.wiki"))?;
/// assert_eq!(verified.address, account.address());
/// # Ok::<(), web3_token::TokenError>(())
/// ```
#[derive(Clone)]
pub struct EthAccount {
    key: SigningKey,
}

impl EthAccount {
    /// Creates an account with a random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            key: SigningKey::random(&mut rng),
        }
    }

    /// Creates an account from a 32-byte private key.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKey` if the bytes are not a valid
    /// secp256k1 scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        SigningKey::from_slice(bytes)
            .map(|key| Self { key })
            .map_err(|_| KeyError::InvalidKey {
                length: bytes.len(),
            })
    }

    /// Creates an account from a hex private key, with or without `0x`.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidHex` if the text is not hex, or
    /// `KeyError::InvalidKey` if the decoded bytes are not a valid key.
    ///
    /// ```
    /// use web3_token_eth::EthAccount;
    ///
    /// let account = EthAccount::from_hex(
    ///     "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
    /// )?;
    /// assert_eq!(account.address(), "0x2c7536e3605d9c16a7a3d7b1898e529396a65c23");
    /// # Ok::<(), web3_token_eth::KeyError>(())
    /// ```
    pub fn from_hex(key: &str) -> Result<Self, KeyError> {
        let digits = key.trim().strip_prefix("0x").unwrap_or(key.trim());
        let bytes = hex::decode(digits).map_err(|e| KeyError::InvalidHex {
            reason: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Returns the account address, `0x`-prefixed and lower-case.
    #[must_use]
    pub fn address(&self) -> String {
        address_of(self.key.verifying_key())
    }

    /// Signs a message and returns the 65 raw signature bytes.
    ///
    /// # Errors
    ///
    /// Returns `SigningError` if the underlying ECDSA operation fails.
    pub fn sign_bytes(&self, message: &str) -> Result<[u8; 65], SigningError> {
        let digest = hash_message(message);
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&digest)
            .map_err(SigningError::new)?;

        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = V_OFFSET + recovery_id.to_byte();
        Ok(bytes)
    }
}

impl MessageSigner for EthAccount {
    fn sign_message(&self, message: &str) -> Result<String, SigningError> {
        let bytes = self.sign_bytes(message)?;
        trace!(address = %self.address(), "signed message");
        Ok(format!("0x{}", hex::encode(bytes)))
    }
}

impl fmt::Debug for EthAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthAccount")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

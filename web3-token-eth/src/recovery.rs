//! Signer recovery for `personal_sign` signatures.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use web3_token::{AddressRecovery, SigningError};

use crate::hash::{address_of, hash_message};

/// Recovers Ethereum addresses from 65-byte `r || s || v` signatures.
///
/// `v` may be given as a raw recovery id (`0`, `1`) or in Ethereum form
/// (`27`, `28`). High-`s` signatures are normalized before recovery.
#[derive(Debug, Clone, Copy, Default)]
pub struct EthRecovery;

impl EthRecovery {
    /// Recovers the public key that produced `signature` over `message`.
    ///
    /// # Errors
    ///
    /// Returns `SigningError` if the signature is not 65 bytes, `v` is out of
    /// range, or no key matches.
    pub fn recover_key(message: &str, signature: &[u8]) -> Result<VerifyingKey, SigningError> {
        let [rs @ .., v] = signature else {
            return Err(SigningError::new("signature is empty"));
        };
        if rs.len() != 64 {
            return Err(SigningError::new(format!(
                "signature must be 65 bytes, got {}",
                signature.len()
            )));
        }

        let recid_byte = match *v {
            0 | 1 => *v,
            27 | 28 => *v - 27,
            other => {
                return Err(SigningError::new(format!(
                    "invalid recovery byte {other}"
                )));
            }
        };
        let mut recovery_id = RecoveryId::from_byte(recid_byte)
            .ok_or_else(|| SigningError::new(format!("invalid recovery byte {v}")))?;

        let mut signature = Signature::from_slice(rs).map_err(SigningError::new)?;
        if let Some(normalized) = signature.normalize_s() {
            signature = normalized;
            recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
        }

        VerifyingKey::recover_from_prehash(&hash_message(message), &signature, recovery_id)
            .map_err(SigningError::new)
    }
}

impl AddressRecovery for EthRecovery {
    fn recover_address(&self, message: &str, signature: &[u8]) -> Result<String, SigningError> {
        Self::recover_key(message, signature).map(|key| address_of(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EthAccount;

    const KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn recovers_signing_account() {
        let account = EthAccount::from_hex(KEY).unwrap();
        let signature = account.sign_bytes("Web3 Token Version: 2").unwrap();
        let address = EthRecovery
            .recover_address("Web3 Token Version: 2", &signature)
            .unwrap();
        assert_eq!(address, account.address());
    }

    #[test]
    fn accepts_raw_recovery_id() {
        let account = EthAccount::from_hex(KEY).unwrap();
        let mut signature = account.sign_bytes("msg").unwrap();
        signature[64] -= 27;
        let address = EthRecovery.recover_address("msg", &signature).unwrap();
        assert_eq!(address, account.address());
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(EthRecovery.recover_address("msg", &[]).is_err());
        assert!(EthRecovery.recover_address("msg", &[0u8; 64]).is_err());

        let account = EthAccount::from_hex(KEY).unwrap();
        let mut signature = account.sign_bytes("msg").unwrap();
        signature[64] = 35;
        assert!(EthRecovery.recover_address("msg", &signature).is_err());
    }

    #[test]
    fn different_message_recovers_different_address() {
        let account = EthAccount::from_hex(KEY).unwrap();
        let signature = account.sign_bytes("original").unwrap();
        if let Ok(address) = EthRecovery.recover_address("tampered", &signature) {
            assert_ne!(address, account.address());
        }
    }
}

//! Ethereum signing and recovery for `web3-token`.
//!
//! This crate provides the secp256k1 side of the token protocol:
//!
//! - [`EthAccount`] implements [`web3_token::MessageSigner`] with
//!   `personal_sign` semantics (EIP-191 prefix, Keccak-256, recoverable
//!   ECDSA).
//! - [`EthRecovery`] implements [`web3_token::AddressRecovery`], turning a
//!   message and its 65-byte signature back into the signer's address.
//!
//! # Example
//!
//! ```
//! use web3_token::{Issuer, SignOptions, Verifier, VerifyOptions};
//! use web3_token_eth::{EthAccount, EthRecovery};
//!
//! let account = EthAccount::from_hex(
//!     "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
//! )
//! .unwrap();
//!
//! let token = Issuer::new(account.clone())
//!     .sign(&SignOptions::new().domain("iq.wiki").expires_in("1h"))
//!     .unwrap();
//!
//! let verified = Verifier::new(EthRecovery)
//!     .verify(&token, &VerifyOptions::new().domain("iq.wiki"))
//!     .unwrap();
//!
//! assert_eq!(verified.address, "0x2c7536e3605d9c16a7a3d7b1898e529396a65c23");
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod account;
mod error;
mod hash;
mod recovery;

pub use k256;

pub use account::EthAccount;
pub use error::KeyError;
pub use hash::{address_of, hash_message};
pub use recovery::EthRecovery;

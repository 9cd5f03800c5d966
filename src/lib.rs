//! Sign-in-with-Ethereum style authentication tokens.
//!
//! A token is an account's signature over a canonical, human-readable
//! message, wrapped together with that message into a base64 envelope. The
//! message carries the claims: the relying-party domain, a statement, a URI,
//! the chain, a nonce, and the validity window.
//!
//! # Overview
//!
//! ```text
//! SignOptions ─validate─▶ TokenClaims ─build─▶ message ─signer─▶ signature ─wrap─▶ token
//! token ─unwrap─▶ (message, signature) ─recovery─▶ address ─parse─▶ TokenClaims ─check─▶ VerifiedToken
//! ```
//!
//! The crate never touches key material. Signing and signer recovery are
//! delegated to the [`MessageSigner`] and [`AddressRecovery`] traits; the
//! `web3-token-eth` crate implements both for secp256k1 Ethereum accounts.
//!
//! # Quick Start
//!
//! ```rust
//! use web3_token::{sign, verify, AddressRecovery, SignOptions, SigningError, VerifyOptions};
//!
//! // A stand-in wallet: signs by echoing the message length as hex.
//! let signer = |message: &str| -> Result<String, SigningError> {
//!     Ok(format!("0x{:08x}", message.len()))
//! };
//!
//! struct Wallet;
//!
//! impl AddressRecovery for Wallet {
//!     fn recover_address(&self, _: &str, _: &[u8]) -> Result<String, SigningError> {
//!         Ok("0x73D5F2E0E8bD2Fa3F27D3B40A1CBb0e0e9A0bE6E".into())
//!     }
//! }
//!
//! let token = sign(
//!     &signer,
//!     &SignOptions::new()
//!         .domain("iq.wiki")
//!         .statement("Sign in to edit")
//!         .expires_in("2h"),
//! )
//! .unwrap();
//!
//! let verified = verify(&token, &Wallet, &VerifyOptions::new().domain("iq.wiki")).unwrap();
//! assert_eq!(verified.address, "0x73d5f2e0e8bd2fa3f27d3b40a1cbb0e0e9a0be6e");
//! assert_eq!(verified.claims.statement.as_deref(), Some("Sign in to edit"));
//! ```
//!
//! # Verification Order
//!
//! | Step | Failure |
//! |------|---------|
//! | Envelope decoding | [`TokenError::MalformedToken`] |
//! | Signer recovery | [`TokenError::Signing`] |
//! | Protocol version | [`TokenError::UnsupportedVersion`] |
//! | Body parsing | [`TokenError::MalformedBody`] |
//! | Expiration time | [`TokenError::Expired`] |
//! | Not-before time | [`TokenError::NotYetValid`] |
//! | Domain | [`TokenError::DomainMismatch`] |
//!
//! Time comparisons are strict with no grace window: a token is still valid
//! at the exact instant it expires.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod account;
mod claims;
mod clock;
mod codec;
mod constants;
mod error;
mod extract;
mod issuer;
mod message;
mod nonce;
mod options;
pub mod prelude;
mod sections;
mod timespan;
mod validation;
mod verification;
mod verifier;

pub use account::{AddressRecovery, MessageSigner};
pub use claims::{TokenClaims, format_timestamp, parse_timestamp};
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{DecryptedToken, Envelope, decrypt, unwrap_envelope, wrap};
pub use constants::{
    DEFAULT_EXPIRES_IN, DOMAIN_BANNER_SUFFIX, MIN_SUPPORTED_VERSION, NONCE_UPPER_BOUND,
    TOKEN_VERSION,
};
pub use error::{MalformedTokenKind, SigningError, TimespanError, TokenError};
pub use extract::{extract_domain, extract_statement, parse_body};
pub use issuer::{Issuer, sign};
pub use message::build_message;
pub use nonce::{FixedNonce, NonceSource, RandomNonce};
pub use options::{SignOptions, VerifyOptions};
pub use sections::{normalize_header_keys, parse_headers, split_sections};
pub use timespan::{Expiry, resolve_duration, resolve_instant};
pub use validation::{is_url, is_valid_domain, validate_claims, validate_options};
pub use verification::{check_domain, check_expiration, check_not_before, check_version};
pub use verifier::{VerifiedToken, Verifier, verify};

//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use web3_token::prelude::*;
//!
//! let options = SignOptions::new().domain("iq.wiki").expires_in("1h");
//! assert!(validate_options(&options).is_ok());
//! ```
//!
//! Section-level parsing helpers and the pure check functions are left out;
//! import them from the crate root when needed.

pub use crate::{
    // Entry points
    Issuer, Verifier, decrypt, sign, validate_options, verify,
    // Capabilities
    AddressRecovery, Clock, MessageSigner, NonceSource,
    // Data
    DecryptedToken, Expiry, SignOptions, TokenClaims, VerifiedToken, VerifyOptions,
    // Errors
    MalformedTokenKind, SigningError, TimespanError, TokenError,
};

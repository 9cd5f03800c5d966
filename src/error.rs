//! Error types for token signing and verification.

use std::fmt;

use thiserror::Error;

/// Errors that can occur while signing, decoding or verifying a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Missing or invalid input to `sign` or the timespan resolver.
    #[error("{reason}")]
    Argument {
        /// Description of the bad argument
        reason: String,
    },
    /// A claim failed structural checks before any text was built.
    #[error("invalid \"{field}\": {reason}")]
    Validation {
        /// Name of the offending option
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },
    /// The signing or recovery capability failed.
    #[error(transparent)]
    Signing(#[from] SigningError),
    /// The token envelope could not be decoded.
    #[error("token malformed ({0})")]
    MalformedToken(MalformedTokenKind),
    /// The signed message lacks a required header or carries an unreadable value.
    #[error("decrypted body is damaged: {reason}")]
    MalformedBody {
        /// Description of the damage
        reason: String,
    },
    /// The token declares a protocol version this crate does not handle.
    #[error("tokens version {version} are not supported by the current version of module")]
    UnsupportedVersion {
        /// The declared version
        version: u32,
    },
    /// The token's expiration time has passed.
    #[error("token expired at {expired_at}; sign a new token")]
    Expired {
        /// When the token expired
        expired_at: String,
    },
    /// The token's not-before time is still in the future.
    #[error("it's not yet time to use the token; valid from {valid_from}")]
    NotYetValid {
        /// When the token becomes valid
        valid_from: String,
    },
    /// The token was issued for a different domain.
    #[error("inappropriate token domain: expected '{expected}', token carries {}", describe_domain(.found.as_deref()))]
    DomainMismatch {
        /// Domain the caller required
        expected: String,
        /// Domain carried by the token, if any
        found: Option<String>,
    },
}

fn describe_domain(found: Option<&str>) -> String {
    found.map_or_else(|| "no domain".to_string(), |d| format!("'{d}'"))
}

/// Reasons a token envelope is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedTokenKind {
    /// The token string is empty.
    Empty,
    /// The token is not base64 of a non-empty UTF-8 string.
    NotBase64,
    /// The decoded envelope is not JSON with string `body` and `signature` fields.
    Unparseable,
    /// The envelope carries an empty message body.
    EmptyBody,
    /// The envelope carries an empty signature.
    EmptySignature,
    /// The signature is not hex encoded.
    InvalidSignature,
    /// The body carries no `Web3 Token Version` header.
    MissingVersion,
}

impl fmt::Display for MalformedTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Empty => "token required",
            Self::NotBase64 => "must be base64 encoded",
            Self::Unparseable => "unparseable",
            Self::EmptyBody => "empty message",
            Self::EmptySignature => "empty signature",
            Self::InvalidSignature => "signature must be hex encoded",
            Self::MissingVersion => "missing version",
        };
        f.write_str(reason)
    }
}

/// Failure reported by a signing or address-recovery capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("signing capability failed: {reason}")]
pub struct SigningError {
    /// Description reported by the capability
    pub reason: String,
}

impl SigningError {
    /// Creates a signing error from any displayable reason.
    #[must_use]
    pub fn new(reason: impl fmt::Display) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

/// Errors from parsing a duration expression such as `"20h"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimespanError {
    /// The expression does not match `<digits><unit>`.
    #[error("'{input}' is not a timespan; expected digits followed by d, h, m, s or ms")]
    Unparseable {
        /// The rejected expression
        input: String,
    },
    /// The expression parsed but its millisecond value does not fit in 64 bits.
    #[error("timespan '{input}' is too large")]
    Overflow {
        /// The rejected expression
        input: String,
    },
}

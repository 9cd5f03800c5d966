//! Options accepted by [`sign`](crate::sign) and [`verify`](crate::verify).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::timespan::Expiry;

/// Options for signing a token.
///
/// Every field is optional. When neither `expiration_time` nor `expires_in`
/// is set the token expires one day after issue; when both are set
/// `expiration_time` wins.
///
/// # Example
///
/// ```
/// use web3_token::SignOptions;
///
/// let options = SignOptions::new()
///     .domain("iq.wiki")
///     .statement("Sign in to edit")
///     .expires_in("2h")
///     .with_nonce(true);
///
/// assert_eq!(options.domain.as_deref(), Some("iq.wiki"));
/// assert!(options.nonce);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignOptions {
    /// Relying-party domain shown in the banner line
    pub domain: Option<String>,
    /// Single-line purpose statement
    pub statement: Option<String>,
    /// URI of the resource being signed into
    pub uri: Option<String>,
    /// Chain the account belongs to
    pub chain_id: Option<u64>,
    /// Caller-defined request correlation id
    pub request_id: Option<String>,
    /// Absolute expiry; overrides `expires_in`
    pub expiration_time: Option<DateTime<Utc>>,
    /// Relative expiry
    pub expires_in: Option<Expiry>,
    /// Activation instant
    pub not_before: Option<DateTime<Utc>>,
    /// Whether to embed a random nonce
    pub nonce: bool,
}

impl SignOptions {
    /// Creates empty options (one day expiry, no optional claims).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that only set a relative expiry.
    #[must_use]
    pub fn expiring_in(expiry: impl Into<Expiry>) -> Self {
        Self::new().expires_in(expiry)
    }

    /// Sets the domain.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the statement.
    #[must_use]
    pub fn statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = Some(statement.into());
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Sets the chain id.
    #[must_use]
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Parses and sets the chain id from text.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Validation` if `chain_id` is not a non-negative integer.
    ///
    /// ```
    /// use web3_token::SignOptions;
    ///
    /// assert_eq!(SignOptions::new().try_chain_id("137")?.chain_id, Some(137));
    /// assert!(SignOptions::new().try_chain_id("ssssa23dsa").is_err());
    /// # Ok::<(), web3_token::TokenError>(())
    /// ```
    pub fn try_chain_id(self, chain_id: &str) -> Result<Self, TokenError> {
        let parsed = chain_id
            .trim()
            .parse::<u64>()
            .map_err(|_| TokenError::Validation {
                field: "chain_id",
                reason: format!("chain_id must be an int, got '{chain_id}'"),
            })?;
        Ok(self.chain_id(parsed))
    }

    /// Sets the request id.
    #[must_use]
    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Sets an absolute expiry.
    #[must_use]
    pub fn expiration_time(mut self, at: DateTime<Utc>) -> Self {
        self.expiration_time = Some(at);
        self
    }

    /// Sets a relative expiry, in milliseconds or as an expression like `"1d"`.
    #[must_use]
    pub fn expires_in(mut self, expiry: impl Into<Expiry>) -> Self {
        self.expires_in = Some(expiry.into());
        self
    }

    /// Sets the activation instant.
    #[must_use]
    pub fn not_before(mut self, at: DateTime<Utc>) -> Self {
        self.not_before = Some(at);
        self
    }

    /// Enables or disables the random nonce.
    #[must_use]
    pub fn with_nonce(mut self, nonce: bool) -> Self {
        self.nonce = nonce;
        self
    }
}

/// Options for verifying a token.
///
/// ```
/// use web3_token::VerifyOptions;
///
/// let options = VerifyOptions::new().domain("iq.wiki");
/// assert_eq!(options.domain.as_deref(), Some("iq.wiki"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOptions {
    /// Domain the token must have been issued for; empty means unchecked
    pub domain: Option<String>,
}

impl VerifyOptions {
    /// Creates options that apply no domain check.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the token to carry `domain`.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_empty() {
        let options = SignOptions::default();
        assert!(options.domain.is_none());
        assert!(options.expiration_time.is_none());
        assert!(options.expires_in.is_none());
        assert!(!options.nonce);
    }

    #[test]
    fn expiring_in_sets_only_expiry() {
        let options = SignOptions::expiring_in("20h");
        assert_eq!(options.expires_in, Some(Expiry::Span("20h".into())));
        assert!(options.domain.is_none());
    }

    #[test]
    fn try_chain_id_rejects_text() {
        let result = SignOptions::new().try_chain_id("not-a-number");
        assert!(matches!(
            result,
            Err(TokenError::Validation {
                field: "chain_id",
                ..
            })
        ));
    }

    #[test]
    fn verify_options_default_has_no_domain() {
        assert!(VerifyOptions::default().domain.is_none());
    }
}

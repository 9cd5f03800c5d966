//! Token claims types.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::constants::{DEFAULT_EXPIRES_IN, TOKEN_VERSION};
use crate::error::TokenError;
use crate::nonce::NonceSource;
use crate::options::SignOptions;
use crate::timespan::{Expiry, resolve_instant};

/// Claims carried by a token's canonical message.
///
/// Timestamps are kept at millisecond precision, the precision of the
/// rendered message, so claims survive a sign/verify round trip unchanged.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use web3_token::{FixedClock, FixedNonce, SignOptions, TokenClaims};
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let claims = TokenClaims::from_options(
///     &SignOptions::new().domain("iq.wiki").expires_in("1h"),
///     &FixedClock::new(now),
///     &FixedNonce(7),
/// )
/// .unwrap();
///
/// assert_eq!(claims.domain.as_deref(), Some("iq.wiki"));
/// assert_eq!(claims.expiration_time, now + chrono::Duration::hours(1));
/// assert_eq!(claims.web3_token_version, "2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Relying-party domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Human-readable purpose statement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
    /// URI of the resource being signed into
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Protocol version marker
    pub web3_token_version: String,
    /// Chain the account belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Random nonce
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
    /// When the token expires
    pub expiration_time: DateTime<Utc>,
    /// When the token becomes valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,
    /// Caller-defined request correlation id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl TokenClaims {
    /// Derives claims from sign options.
    ///
    /// `issued_at` comes from `clock`; the expiry is `expiration_time` if set,
    /// otherwise `expires_in` (default one day) after `issued_at`. A nonce is
    /// drawn only when `options.nonce` is true. Options are not validated
    /// here; see [`validate_options`](crate::validate_options).
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Argument` if `expires_in` cannot be resolved.
    pub fn from_options(
        options: &SignOptions,
        clock: &dyn Clock,
        nonces: &dyn NonceSource,
    ) -> Result<Self, TokenError> {
        let issued_at = clock.now().trunc_subsecs(3);

        let expiration_time = match (&options.expiration_time, &options.expires_in) {
            (Some(at), _) => *at,
            (None, Some(expiry)) => resolve_instant(expiry, issued_at)?,
            (None, None) => resolve_instant(&Expiry::from(DEFAULT_EXPIRES_IN), issued_at)?,
        };

        Ok(Self {
            domain: options.domain.clone(),
            statement: options.statement.clone(),
            uri: options.uri.clone(),
            web3_token_version: TOKEN_VERSION.to_string(),
            chain_id: options.chain_id,
            nonce: options.nonce.then(|| nonces.next_nonce()),
            issued_at,
            expiration_time: expiration_time.trunc_subsecs(3),
            not_before: options.not_before.map(|at| at.trunc_subsecs(3)),
            request_id: options.request_id.clone(),
        })
    }

    /// Rebuilds typed claims from the `snake_case` mapping produced by
    /// [`parse_body`](crate::parse_body).
    ///
    /// # Errors
    ///
    /// Returns `TokenError::MalformedBody` if a required claim is missing, a
    /// timestamp is not ISO-8601, or `chain_id`/`nonce` is not an integer.
    pub fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self, TokenError> {
        let text = |key: &str| fields.get(key).cloned();
        let required = |key: &str| {
            fields.get(key).ok_or_else(|| TokenError::MalformedBody {
                reason: format!("missing '{key}'"),
            })
        };
        let integer = |key: &str| -> Result<Option<u64>, TokenError> {
            fields
                .get(key)
                .map(|value| {
                    value.parse::<u64>().map_err(|_| TokenError::MalformedBody {
                        reason: format!("'{key}' must be an integer, got '{value}'"),
                    })
                })
                .transpose()
        };
        let timestamp = |key: &str, value: &str| {
            parse_timestamp(value).ok_or_else(|| TokenError::MalformedBody {
                reason: format!("'{key}' is not an ISO-8601 timestamp: '{value}'"),
            })
        };

        Ok(Self {
            domain: text("domain"),
            statement: text("statement"),
            uri: text("uri"),
            web3_token_version: required("web3_token_version")?.clone(),
            chain_id: integer("chain_id")?,
            nonce: integer("nonce")?,
            issued_at: timestamp("issued_at", required("issued_at")?.as_str())?,
            expiration_time: timestamp("expiration_time", required("expiration_time")?.as_str())?,
            not_before: fields
                .get("not_before")
                .map(|value| timestamp("not_before", value.as_str()))
                .transpose()?,
            request_id: text("request_id"),
        })
    }

    /// Returns true if the token has expired at `now` (strictly after expiry).
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_time < now
    }

    /// Returns true if the token is not yet valid at `now`.
    #[must_use]
    pub fn is_not_yet_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.not_before.is_some_and(|nbf| nbf > now)
    }
}

/// Renders an instant the way the canonical message carries it.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use web3_token::format_timestamp;
///
/// let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
/// assert_eq!(format_timestamp(&at), "2024-01-02T03:04:05.000Z");
/// ```
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an ISO-8601 instant.
///
/// Accepts RFC 3339 with any offset, and offset-less date-times, which are
/// read as UTC.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

//! Canonical message rendering.
//!
//! The message is the exact text handed to the signer:
//!
//! ```text
//! [<domain> wants you to sign in with your Ethereum account.]
//! [<blank>]
//! [<statement>]
//! [<blank>]
//! URI: <uri>                      (optional)
//! Web3 Token Version: <n>
//! Chain ID: <chain_id>            (optional)
//! Nonce: <nonce>                  (optional)
//! Issued At: <ISO-8601>
//! Expiration Time: <ISO-8601>
//! Not Before: <ISO-8601>          (optional)
//! Request ID: <request_id>        (optional)
//! ```
//!
//! Line order is part of the signed contract.

use crate::claims::{TokenClaims, format_timestamp};
use crate::constants::{
    DOMAIN_BANNER_SUFFIX, LABEL_CHAIN_ID, LABEL_EXPIRATION_TIME, LABEL_ISSUED_AT, LABEL_NONCE,
    LABEL_NOT_BEFORE, LABEL_REQUEST_ID, LABEL_URI, LABEL_VERSION,
};

/// Renders claims into the canonical signable text.
///
/// Lines are joined with `\n` and there is no trailing newline. Identical
/// claims always render to identical text.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use web3_token::{build_message, TokenClaims};
///
/// let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let claims = TokenClaims {
///     domain: Some("iq.wiki".into()),
///     statement: None,
///     uri: None,
///     web3_token_version: "2".into(),
///     chain_id: None,
///     nonce: None,
///     issued_at,
///     expiration_time: issued_at + chrono::Duration::days(1),
///     not_before: None,
///     request_id: None,
/// };
///
/// assert_eq!(
///     build_message(&claims),
///     "iq.wiki wants you to sign in with your Ethereum account.\n\
///      \n\
///      Web3 Token Version: 2\n\
///      Issued At: 2024-01-01T00:00:00.000Z\n\
///      Expiration Time: 2024-01-02T00:00:00.000Z"
/// );
/// ```
#[must_use]
pub fn build_message(claims: &TokenClaims) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(domain) = claims.domain.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("{domain}{DOMAIN_BANNER_SUFFIX}"));
        lines.push(String::new());
    }

    if let Some(statement) = claims.statement.as_deref().filter(|s| !s.is_empty()) {
        lines.push(statement.to_string());
        lines.push(String::new());
    }

    let headers = [
        (LABEL_URI, claims.uri.clone()),
        (LABEL_VERSION, Some(claims.web3_token_version.clone())),
        (LABEL_CHAIN_ID, claims.chain_id.map(|id| id.to_string())),
        (LABEL_NONCE, claims.nonce.map(|n| n.to_string())),
        (LABEL_ISSUED_AT, Some(format_timestamp(&claims.issued_at))),
        (
            LABEL_EXPIRATION_TIME,
            Some(format_timestamp(&claims.expiration_time)),
        ),
        (
            LABEL_NOT_BEFORE,
            claims.not_before.as_ref().map(format_timestamp),
        ),
        (LABEL_REQUEST_ID, claims.request_id.clone()),
    ];

    lines.extend(
        headers
            .into_iter()
            .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}"))),
    );

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap()
    }

    fn minimal_claims() -> TokenClaims {
        TokenClaims {
            domain: None,
            statement: None,
            uri: None,
            web3_token_version: "2".into(),
            chain_id: None,
            nonce: None,
            issued_at: issued_at(),
            expiration_time: issued_at() + Duration::hours(1),
            not_before: None,
            request_id: None,
        }
    }

    #[test]
    fn minimal_message_is_header_block_only() {
        assert_eq!(
            build_message(&minimal_claims()),
            "Web3 Token Version: 2\n\
             Issued At: 2024-05-17T12:00:00.000Z\n\
             Expiration Time: 2024-05-17T13:00:00.000Z"
        );
    }

    #[test]
    fn full_message_has_fixed_order() {
        let claims = TokenClaims {
            domain: Some("iq.wiki".into()),
            statement: Some("Sign in to edit".into()),
            uri: Some("https://iq.wiki/login".into()),
            chain_id: Some(137),
            nonce: Some(12_345),
            not_before: Some(issued_at() - Duration::seconds(1)),
            request_id: Some("req-1".into()),
            ..minimal_claims()
        };

        assert_eq!(
            build_message(&claims),
            "iq.wiki wants you to sign in with your Ethereum account.\n\
             \n\
             Sign in to edit\n\
             \n\
             URI: https://iq.wiki/login\n\
             Web3 Token Version: 2\n\
             Chain ID: 137\n\
             Nonce: 12345\n\
             Issued At: 2024-05-17T12:00:00.000Z\n\
             Expiration Time: 2024-05-17T13:00:00.000Z\n\
             Not Before: 2024-05-17T11:59:59.000Z\n\
             Request ID: req-1"
        );
    }

    #[test]
    fn statement_without_domain() {
        let claims = TokenClaims {
            statement: Some("Test".into()),
            ..minimal_claims()
        };
        assert!(build_message(&claims).starts_with("Test\n\nWeb3 Token Version: 2\n"));
    }

    #[test]
    fn empty_domain_and_statement_are_omitted() {
        let claims = TokenClaims {
            domain: Some(String::new()),
            statement: Some(String::new()),
            ..minimal_claims()
        };
        assert_eq!(build_message(&claims), build_message(&minimal_claims()));
    }

    #[test]
    fn no_trailing_newline() {
        assert!(!build_message(&minimal_claims()).ends_with('\n'));
    }

    #[test]
    fn rendering_is_deterministic() {
        let claims = TokenClaims {
            domain: Some("iq.wiki".into()),
            nonce: Some(1),
            ..minimal_claims()
        };
        assert_eq!(build_message(&claims), build_message(&claims.clone()));
    }
}

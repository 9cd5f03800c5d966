//! Structural checks run on sign options and claims before any text is built.

use crate::claims::TokenClaims;
use crate::codec::scan_version;
use crate::constants::DOMAIN_BANNER_SUFFIX;
use crate::error::TokenError;
use crate::options::SignOptions;
use crate::timespan::Expiry;

/// Validates sign options.
///
/// Checks, in order: no string option contains a line feed, the domain has
/// the `example.com` shape, the URI has a scheme and an authority, and no
/// text claim can be misread once rendered (see [`validate_claims`]).
///
/// # Errors
///
/// Returns `TokenError::Validation` naming the first offending option.
///
/// # Examples
///
/// ```
/// use web3_token::{validate_options, SignOptions};
///
/// assert!(validate_options(&SignOptions::new().domain("iq.wiki")).is_ok());
/// assert!(validate_options(&SignOptions::new().uri("local.com")).is_err());
/// ```
pub fn validate_options(options: &SignOptions) -> Result<(), TokenError> {
    let span = match &options.expires_in {
        Some(Expiry::Span(span)) => Some(span.as_str()),
        _ => None,
    };
    check_line_feeds(&[
        ("domain", options.domain.as_deref()),
        ("statement", options.statement.as_deref()),
        ("uri", options.uri.as_deref()),
        ("request_id", options.request_id.as_deref()),
        ("expires_in", span),
    ])?;

    if let Some(domain) = &options.domain {
        if !is_valid_domain(domain) {
            return Err(TokenError::Validation {
                field: "domain",
                reason: "invalid domain format (must be example.com)".to_string(),
            });
        }
    }

    if let Some(uri) = &options.uri {
        if !is_url(uri) {
            return Err(TokenError::Validation {
                field: "uri",
                reason: "invalid uri format (must be https://example.com/login)".to_string(),
            });
        }
    }

    check_rendering(
        options.domain.as_deref(),
        options.statement.as_deref(),
        options.uri.as_deref(),
        options.request_id.as_deref(),
    )
}

/// Checks that claims render to a message that parses back to the same claims.
///
/// Rejects, in order: a line feed in any text claim, a text claim ending
/// with the domain banner, a statement or URI containing a
/// `Web3 Token Version` marker (the verifier reads the first one in the
/// message), and a URI or request id with surrounding whitespace (header
/// values are trimmed when parsed).
///
/// # Errors
///
/// Returns `TokenError::Validation` naming the first offending claim.
///
/// ```
/// use web3_token::{validate_claims, TokenClaims};
/// use chrono::Utc;
///
/// let mut claims = TokenClaims {
///     domain: None,
///     statement: Some("Sign in".into()),
///     uri: None,
///     web3_token_version: "2".into(),
///     chain_id: None,
///     nonce: None,
///     issued_at: Utc::now(),
///     expiration_time: Utc::now(),
///     not_before: None,
///     request_id: None,
/// };
/// assert!(validate_claims(&claims).is_ok());
///
/// claims.statement = Some("Sign in\n\nevil.com".into());
/// assert!(validate_claims(&claims).is_err());
/// ```
pub fn validate_claims(claims: &TokenClaims) -> Result<(), TokenError> {
    check_line_feeds(&[
        ("domain", claims.domain.as_deref()),
        ("statement", claims.statement.as_deref()),
        ("uri", claims.uri.as_deref()),
        ("request_id", claims.request_id.as_deref()),
        ("web3_token_version", Some(claims.web3_token_version.as_str())),
    ])?;
    check_rendering(
        claims.domain.as_deref(),
        claims.statement.as_deref(),
        claims.uri.as_deref(),
        claims.request_id.as_deref(),
    )
}

fn check_line_feeds(fields: &[(&'static str, Option<&str>)]) -> Result<(), TokenError> {
    for &(field, value) in fields {
        if value.is_some_and(|v| v.contains('\n')) {
            return Err(TokenError::Validation {
                field,
                reason: format!("\"{field}\" option cannot have LF (\\n)"),
            });
        }
    }
    Ok(())
}

fn check_rendering(
    domain: Option<&str>,
    statement: Option<&str>,
    uri: Option<&str>,
    request_id: Option<&str>,
) -> Result<(), TokenError> {
    let fields = [
        ("domain", domain),
        ("statement", statement),
        ("uri", uri),
        ("request_id", request_id),
    ];
    for (field, value) in fields {
        if value.is_some_and(|v| v.ends_with(DOMAIN_BANNER_SUFFIX)) {
            return Err(TokenError::Validation {
                field,
                reason: format!("{field} cannot end with the domain banner"),
            });
        }
    }

    for (field, value) in [("statement", statement), ("uri", uri)] {
        if value.is_some_and(|v| scan_version(v).is_some()) {
            return Err(TokenError::Validation {
                field,
                reason: format!("{field} cannot contain a \"Web3 Token Version\" marker"),
            });
        }
    }

    for (field, value) in [("uri", uri), ("request_id", request_id)] {
        if value.is_some_and(|v| v.trim() != v) {
            return Err(TokenError::Validation {
                field,
                reason: format!("{field} cannot start or end with whitespace"),
            });
        }
    }

    Ok(())
}

/// Returns true if `value` has the shape `label(.label|-label)*.tld`.
///
/// Labels are ASCII alphanumeric, joined by single dots or hyphens; the
/// top-level label is at least two ASCII letters. Case-insensitive.
///
/// ```
/// use web3_token::is_valid_domain;
///
/// assert!(is_valid_domain("iq.wiki"));
/// assert!(is_valid_domain("my-app.Example.COM"));
/// assert!(!is_valid_domain("localhost"));
/// assert!(!is_valid_domain("bad..example.com"));
/// ```
#[must_use]
pub fn is_valid_domain(value: &str) -> bool {
    let Some((head, tld)) = value.rsplit_once('.') else {
        return false;
    };

    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }

    head.split(['.', '-'])
        .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Returns true if `value` has a URI scheme followed by a non-empty authority.
///
/// ```
/// use web3_token::is_url;
///
/// assert!(is_url("https://example.com/login"));
/// assert!(!is_url("local.com"));
/// assert!(!is_url("mailto:someone@example.com"));
/// ```
#[must_use]
pub fn is_url(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once("://") else {
        return false;
    };

    let mut scheme_chars = scheme.chars();
    let scheme_ok = scheme_chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok {
        return false;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !authority.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_options() {
        let options = SignOptions::new()
            .domain("iq.wiki")
            .statement("Sign in to edit")
            .uri("https://iq.wiki/login")
            .chain_id(1)
            .request_id("req-1");
        assert!(validate_options(&options).is_ok());
    }

    #[test]
    fn rejects_line_feed_in_any_text_option() {
        let cases = [
            ("statement", SignOptions::new().statement("line one\nline two")),
            ("request_id", SignOptions::new().request_id("a\nb")),
            ("domain", SignOptions::new().domain("iq.wiki\n")),
            ("uri", SignOptions::new().uri("https://iq.wiki/\nx")),
            ("expires_in", SignOptions::new().expires_in("1d\n")),
        ];
        for (expected, options) in cases {
            match validate_options(&options) {
                Err(TokenError::Validation { field, reason }) => {
                    assert_eq!(field, expected);
                    assert!(reason.contains("cannot have LF"));
                }
                other => panic!("expected LF rejection for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_bad_domain() {
        let result = validate_options(&SignOptions::new().domain("not a domain"));
        assert!(matches!(
            result,
            Err(TokenError::Validation { field: "domain", .. })
        ));
    }

    #[test]
    fn rejects_bad_uri() {
        for uri in ["local.com", "invalid-url", "https://", "://example.com"] {
            let result = validate_options(&SignOptions::new().uri(uri));
            assert!(
                matches!(result, Err(TokenError::Validation { field: "uri", .. })),
                "expected '{uri}' to be rejected"
            );
        }
    }

    #[test]
    fn rejects_statement_that_reads_as_banner() {
        let statement = format!("evil.com{DOMAIN_BANNER_SUFFIX}");
        let result = validate_options(&SignOptions::new().statement(statement));
        assert!(matches!(
            result,
            Err(TokenError::Validation {
                field: "statement",
                ..
            })
        ));
    }

    #[test]
    fn rejects_version_marker_in_statement_and_uri() {
        let cases = [
            (
                "statement",
                SignOptions::new().statement("Migrating from Web3 Token Version: 1 wallets"),
            ),
            ("statement", SignOptions::new().statement("see web3-token: Web3-Token-Version: 2")),
            (
                "uri",
                SignOptions::new().uri("https://iq.wiki/Web3 Token Version: 1"),
            ),
        ];
        for (expected, options) in cases {
            match validate_options(&options) {
                Err(TokenError::Validation { field, reason }) => {
                    assert_eq!(field, expected);
                    assert!(reason.contains("Web3 Token Version"));
                }
                other => panic!("expected version marker rejection for {expected}, got {other:?}"),
            }
        }

        let plain = SignOptions::new().statement("Sign in with Web3 Token, version two");
        assert!(validate_options(&plain).is_ok());
    }

    #[test]
    fn rejects_surrounding_whitespace_in_header_values() {
        let cases = [
            ("uri", SignOptions::new().uri("https://iq.wiki/login ")),
            ("uri", SignOptions::new().uri("https://iq.wiki/login\t")),
            ("request_id", SignOptions::new().request_id(" req-1")),
            ("request_id", SignOptions::new().request_id("req-1 ")),
        ];
        for (expected, options) in cases {
            match validate_options(&options) {
                Err(TokenError::Validation { field, reason }) => {
                    assert_eq!(field, expected);
                    assert!(reason.contains("whitespace"));
                }
                other => panic!("expected whitespace rejection for {expected}, got {other:?}"),
            }
        }

        let inner = SignOptions::new().request_id("req 1");
        assert!(validate_options(&inner).is_ok());
    }

    #[test]
    fn claims_checks_match_option_checks() {
        let claims = TokenClaims {
            domain: Some("iq.wiki".into()),
            statement: Some("Sign in".into()),
            uri: Some("https://iq.wiki/login".into()),
            web3_token_version: "2".into(),
            chain_id: Some(1),
            nonce: Some(7),
            issued_at: chrono::Utc::now(),
            expiration_time: chrono::Utc::now(),
            not_before: None,
            request_id: Some("req-1".into()),
        };
        assert!(validate_claims(&claims).is_ok());

        let split = TokenClaims {
            statement: Some(format!("hello\n\nevil.com{DOMAIN_BANNER_SUFFIX}")),
            ..claims.clone()
        };
        assert!(matches!(
            validate_claims(&split),
            Err(TokenError::Validation {
                field: "statement",
                ..
            })
        ));

        let version = TokenClaims {
            web3_token_version: "2\nNonce: 1".into(),
            ..claims
        };
        assert!(matches!(
            validate_claims(&version),
            Err(TokenError::Validation {
                field: "web3_token_version",
                ..
            })
        ));
    }

    #[test]
    fn domain_shapes() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("a.b.c.io"));
        assert!(is_valid_domain("x-y.z9.dev"));
        assert!(is_valid_domain("EXAMPLE.COM"));

        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain(".com"));
        assert!(!is_valid_domain("example.c"));
        assert!(!is_valid_domain("example.c0m"));
        assert!(!is_valid_domain("-example.com"));
        assert!(!is_valid_domain("example-.com"));
        assert!(!is_valid_domain("exa--mple.com"));
        assert!(!is_valid_domain("exa_mple.com"));
        assert!(!is_valid_domain("example.com:8080"));
    }

    #[test]
    fn url_shapes() {
        assert!(is_url("http://localhost:3000"));
        assert!(is_url("https://example.com?next=/home"));
        assert!(is_url("git+ssh://host/repo"));

        assert!(!is_url(""));
        assert!(!is_url("https:///path"));
        assert!(!is_url("1http://example.com"));
    }
}

//! Pure verification checks.
//!
//! Each check takes the claim under test and the reference value explicitly,
//! with no clock or I/O, so it can be unit tested in isolation.
//!
//! | Function | Rejects when |
//! |----------|--------------|
//! | [`check_version`] | declared version is older than [`MIN_SUPPORTED_VERSION`] |
//! | [`check_expiration`] | expiration time is strictly before now |
//! | [`check_not_before`] | not-before time is strictly after now |
//! | [`check_domain`] | a required domain differs from the token's domain |

use chrono::{DateTime, Utc};

use crate::claims::format_timestamp;
use crate::constants::MIN_SUPPORTED_VERSION;
use crate::error::TokenError;

/// Checks that a token's protocol version is supported.
///
/// # Errors
///
/// Returns `TokenError::UnsupportedVersion` if `version` is below
/// [`MIN_SUPPORTED_VERSION`].
///
/// ```
/// use web3_token::check_version;
///
/// assert!(check_version(2).is_ok());
/// assert!(check_version(1).is_err());
/// ```
pub fn check_version(version: u32) -> Result<(), TokenError> {
    if version < MIN_SUPPORTED_VERSION {
        Err(TokenError::UnsupportedVersion { version })
    } else {
        Ok(())
    }
}

/// Checks that a token has not expired at `now`.
///
/// A token is still valid at the exact instant of expiry.
///
/// # Errors
///
/// Returns `TokenError::Expired` if `expiration_time < now`.
///
/// ```
/// use chrono::{Duration, Utc};
/// use web3_token::check_expiration;
///
/// let now = Utc::now();
/// assert!(check_expiration(now + Duration::hours(1), now).is_ok());
/// assert!(check_expiration(now, now).is_ok());
/// assert!(check_expiration(now - Duration::seconds(1), now).is_err());
/// ```
pub fn check_expiration(
    expiration_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), TokenError> {
    if expiration_time < now {
        Err(TokenError::Expired {
            expired_at: format_timestamp(&expiration_time),
        })
    } else {
        Ok(())
    }
}

/// Checks that a token is already valid at `now`.
///
/// # Errors
///
/// Returns `TokenError::NotYetValid` if `not_before` is set and later than `now`.
pub fn check_not_before(
    not_before: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), TokenError> {
    match not_before {
        Some(valid_from) if valid_from > now => Err(TokenError::NotYetValid {
            valid_from: format_timestamp(&valid_from),
        }),
        _ => Ok(()),
    }
}

/// Checks that a token was issued for the `expected` domain.
///
/// An absent or empty `expected` domain disables the check. Comparison is
/// exact.
///
/// # Errors
///
/// Returns `TokenError::DomainMismatch` if `expected` is non-empty and
/// differs from `found`.
///
/// ```
/// use web3_token::check_domain;
///
/// assert!(check_domain(Some("iq.wiki"), Some("iq.wiki")).is_ok());
/// assert!(check_domain(None, Some("iq.wiki")).is_ok());
/// assert!(check_domain(Some("other.domain"), Some("iq.wiki")).is_err());
/// assert!(check_domain(Some("iq.wiki"), None).is_err());
/// ```
pub fn check_domain(expected: Option<&str>, found: Option<&str>) -> Result<(), TokenError> {
    match expected.filter(|domain| !domain.is_empty()) {
        Some(expected) if found != Some(expected) => Err(TokenError::DomainMismatch {
            expected: expected.to_string(),
            found: found.map(str::to_string),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod version_tests {
        use super::*;

        #[test]
        fn legacy_version_is_rejected() {
            assert!(matches!(
                check_version(1),
                Err(TokenError::UnsupportedVersion { version: 1 })
            ));
        }

        #[test]
        fn versions_below_the_minimum_are_rejected() {
            assert!(matches!(
                check_version(0),
                Err(TokenError::UnsupportedVersion { version: 0 })
            ));
        }

        #[test]
        fn current_and_newer_versions_pass() {
            assert!(check_version(2).is_ok());
            assert!(check_version(9).is_ok());
        }
    }

    mod temporal_tests {
        use super::*;
        use chrono::{Duration, TimeZone};

        fn now() -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap()
        }

        #[test]
        fn one_second_past_expiry_is_expired() {
            let result = check_expiration(now() - Duration::seconds(1), now());
            match result {
                Err(TokenError::Expired { expired_at }) => {
                    assert_eq!(expired_at, "2024-05-17T11:59:59.000Z");
                }
                other => panic!("expected Expired, got {other:?}"),
            }
        }

        #[test]
        fn exact_expiry_is_still_valid() {
            assert!(check_expiration(now(), now()).is_ok());
        }

        #[test]
        fn future_not_before_is_rejected() {
            let result = check_not_before(Some(now() + Duration::hours(1)), now());
            assert!(matches!(result, Err(TokenError::NotYetValid { .. })));
        }

        #[test]
        fn past_or_absent_not_before_passes() {
            assert!(check_not_before(Some(now() - Duration::seconds(1)), now()).is_ok());
            assert!(check_not_before(Some(now()), now()).is_ok());
            assert!(check_not_before(None, now()).is_ok());
        }
    }

    mod domain_tests {
        use super::*;

        #[test]
        fn empty_expected_domain_disables_check() {
            assert!(check_domain(Some(""), Some("iq.wiki")).is_ok());
            assert!(check_domain(Some(""), None).is_ok());
        }

        #[test]
        fn mismatch_reports_both_sides() {
            match check_domain(Some("other.domain"), Some("iq.wiki")) {
                Err(TokenError::DomainMismatch { expected, found }) => {
                    assert_eq!(expected, "other.domain");
                    assert_eq!(found.as_deref(), Some("iq.wiki"));
                }
                other => panic!("expected DomainMismatch, got {other:?}"),
            }
        }

        #[test]
        fn comparison_is_case_sensitive() {
            assert!(check_domain(Some("IQ.wiki"), Some("iq.wiki")).is_err());
        }
    }
}

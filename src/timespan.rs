//! Timespan resolution for token expiry.
//!
//! Expiry can be given as a plain millisecond count or as a short
//! expression: digits followed by one of `d`, `h`, `m`, `s`, `ms`
//! (case-insensitive). `m` is minutes and `ms` is milliseconds.
//!
//! ```
//! use web3_token::resolve_duration;
//!
//! assert_eq!(resolve_duration("1d").unwrap(), 86_400_000);
//! assert_eq!(resolve_duration("24h").unwrap(), 86_400_000);
//! assert_eq!(resolve_duration("1ms").unwrap(), 1);
//! assert!(resolve_duration("1.5d").is_err());
//! ```

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
use crate::error::{TimespanError, TokenError};

const EXPIRES_IN_ERROR: &str = "\"expires_in\" argument should be a number of milliseconds or a \
                                string representing a timespan eg: \"1d\", \"20h\", 60";

/// A relative expiry: either milliseconds or a timespan expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expiry {
    /// Milliseconds from now.
    Millis(u64),
    /// Expression such as `"1d"` or `"250ms"`.
    Span(String),
}

impl From<u64> for Expiry {
    fn from(ms: u64) -> Self {
        Self::Millis(ms)
    }
}

impl From<&str> for Expiry {
    fn from(span: &str) -> Self {
        Self::Span(span.to_string())
    }
}

impl From<String> for Expiry {
    fn from(span: String) -> Self {
        Self::Span(span)
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millis(ms) => write!(f, "{ms}"),
            Self::Span(span) => f.write_str(span),
        }
    }
}

/// Converts a timespan expression to milliseconds.
///
/// # Errors
///
/// Returns `TimespanError::Unparseable` for anything other than ASCII digits
/// followed by a known unit (decimals, signs, `y`, a bare unit), and
/// `TimespanError::Overflow` when the result does not fit in a `u64`.
pub fn resolve_duration(expr: &str) -> Result<u64, TimespanError> {
    let unparseable = || TimespanError::Unparseable {
        input: expr.to_string(),
    };

    let split = expr
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(unparseable)?;
    let (digits, unit) = expr.split_at(split);
    if digits.is_empty() {
        return Err(unparseable());
    }

    let multiplier = unit_multiplier(&unit.to_ascii_lowercase()).ok_or_else(unparseable)?;

    let overflow = || TimespanError::Overflow {
        input: expr.to_string(),
    };
    let count: u64 = digits.parse().map_err(|_| overflow())?;
    count.checked_mul(multiplier).ok_or_else(overflow)
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    // "ms" has to win over "m"; exact matching keeps them apart
    match unit {
        "ms" => Some(1),
        "d" => Some(MS_PER_DAY),
        "h" => Some(MS_PER_HOUR),
        "m" => Some(MS_PER_MINUTE),
        "s" => Some(MS_PER_SECOND),
        _ => None,
    }
}

/// Resolves a relative expiry to an absolute instant after `now`.
///
/// # Errors
///
/// Returns `TokenError::Argument` if the expression cannot be parsed or the
/// resulting instant is out of range.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use web3_token::{resolve_instant, Expiry};
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let at = resolve_instant(&Expiry::from("20h"), now).unwrap();
/// assert_eq!(at, now + Duration::hours(20));
///
/// let at = resolve_instant(&Expiry::from(60_000), now).unwrap();
/// assert_eq!(at, now + Duration::minutes(1));
/// ```
pub fn resolve_instant(value: &Expiry, now: DateTime<Utc>) -> Result<DateTime<Utc>, TokenError> {
    let argument_error = || TokenError::Argument {
        reason: EXPIRES_IN_ERROR.to_string(),
    };

    let ms = match value {
        Expiry::Millis(ms) => *ms,
        Expiry::Span(span) => resolve_duration(span).map_err(|_| argument_error())?,
    };

    let ms = i64::try_from(ms).map_err(|_| argument_error())?;
    let delta = Duration::try_milliseconds(ms).ok_or_else(argument_error)?;
    now.checked_add_signed(delta).ok_or_else(argument_error)
}

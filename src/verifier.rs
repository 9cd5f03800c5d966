//! Token verifier.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::account::AddressRecovery;
use crate::claims::TokenClaims;
use crate::clock::{Clock, SystemClock};
use crate::codec::{DecryptedToken, decrypt};
use crate::error::TokenError;
use crate::extract::parse_body;
use crate::options::VerifyOptions;
use crate::verification::{check_domain, check_expiration, check_not_before, check_version};

/// The result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// Lower-cased address of the signing account
    pub address: String,
    /// Typed claims read from the signed message
    pub claims: TokenClaims,
    /// Raw claim mapping, including any headers this crate does not model
    pub fields: BTreeMap<String, String>,
}

/// Verifies tokens against a recovery capability and a clock.
///
/// Checks run in a fixed order and stop at the first failure:
/// envelope decoding and signer recovery, protocol version, body parsing,
/// expiry, not-before, then domain. The clock is read once per call.
///
/// # Example
///
/// ```
/// use web3_token::{
///     AddressRecovery, Issuer, SignOptions, SigningError, Verifier, VerifyOptions,
/// };
///
/// struct Fixed;
///
/// impl AddressRecovery for Fixed {
///     fn recover_address(&self, _: &str, _: &[u8]) -> Result<String, SigningError> {
///         Ok("0xAbC".into())
///     }
/// }
///
/// let signer = |_: &str| -> Result<String, SigningError> { Ok("0x00".into()) };
/// let token = Issuer::new(signer).sign(&SignOptions::new().domain("iq.wiki"))?;
///
/// let verified = Verifier::new(Fixed).verify(&token, &VerifyOptions::new().domain("iq.wiki"))?;
/// assert_eq!(verified.address, "0xabc");
/// assert_eq!(verified.claims.domain.as_deref(), Some("iq.wiki"));
/// # Ok::<(), web3_token::TokenError>(())
/// ```
pub struct Verifier<R> {
    recovery: R,
    clock: Arc<dyn Clock>,
}

impl<R: AddressRecovery> Verifier<R> {
    /// Creates a verifier using the system clock.
    #[must_use]
    pub fn new(recovery: R) -> Self {
        Self {
            recovery,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for expiry and not-before checks.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the recovery capability.
    #[must_use]
    pub fn recovery(&self) -> &R {
        &self.recovery
    }

    /// Decodes a token and recovers its signer without validity checks.
    ///
    /// # Errors
    ///
    /// See [`decrypt`](crate::decrypt).
    pub fn decrypt(&self, token: &str) -> Result<DecryptedToken, TokenError> {
        decrypt(token, &self.recovery)
    }

    /// Verifies a token and returns its signer and claims.
    ///
    /// # Errors
    ///
    /// - `TokenError::MalformedToken` if the envelope cannot be decoded
    /// - `TokenError::Signing` if signer recovery fails
    /// - `TokenError::UnsupportedVersion` for version 1 tokens
    /// - `TokenError::MalformedBody` if required headers are missing or unreadable
    /// - `TokenError::Expired` if the expiration time has passed
    /// - `TokenError::NotYetValid` if the not-before time is in the future
    /// - `TokenError::DomainMismatch` if `options.domain` is set and differs
    pub fn verify(&self, token: &str, options: &VerifyOptions) -> Result<VerifiedToken, TokenError> {
        let DecryptedToken {
            version,
            address,
            body,
            ..
        } = self.decrypt(token)?;

        check_version(version)?;

        let fields = parse_body(body.split('\n'))?;
        let claims = TokenClaims::from_fields(&fields)?;

        let now = self.clock.now();
        check_expiration(claims.expiration_time, now)?;
        check_not_before(claims.not_before, now)?;
        check_domain(options.domain.as_deref(), claims.domain.as_deref())?;

        debug!(
            %address,
            version,
            domain = claims.domain.as_deref(),
            "verified token"
        );

        Ok(VerifiedToken {
            address,
            claims,
            fields,
        })
    }
}

impl<R> fmt::Debug for Verifier<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier").finish_non_exhaustive()
    }
}

/// Verifies a token against the system clock.
///
/// # Errors
///
/// See [`Verifier::verify`].
pub fn verify<R>(
    token: &str,
    recovery: &R,
    options: &VerifyOptions,
) -> Result<VerifiedToken, TokenError>
where
    R: AddressRecovery + ?Sized,
{
    Verifier::new(recovery).verify(token, options)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::clock::FixedClock;
    use crate::codec::wrap;
    use crate::error::{MalformedTokenKind, SigningError};
    use crate::issuer::Issuer;
    use crate::nonce::FixedNonce;
    use crate::options::SignOptions;

    const ADDRESS: &str = "0x00000000000000000000000000000000DeaDBeef";

    struct StaticRecovery;

    impl AddressRecovery for StaticRecovery {
        fn recover_address(&self, _: &str, _: &[u8]) -> Result<String, SigningError> {
            Ok(ADDRESS.to_string())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap()
    }

    fn token(options: &SignOptions) -> String {
        let signer = |_: &str| -> Result<String, SigningError> { Ok("0x01".into()) };
        Issuer::new(signer)
            .with_clock(FixedClock::new(now()))
            .with_nonce_source(FixedNonce(1))
            .sign(options)
            .unwrap()
    }

    fn verifier_at(at: DateTime<Utc>) -> Verifier<StaticRecovery> {
        Verifier::new(StaticRecovery).with_clock(FixedClock::new(at))
    }

    #[test]
    fn verifies_fresh_token() {
        let token = token(&SignOptions::new().domain("iq.wiki").chain_id(1));
        let verified = verifier_at(now()).verify(&token, &VerifyOptions::new()).unwrap();

        assert_eq!(verified.address, ADDRESS.to_lowercase());
        assert_eq!(verified.claims.chain_id, Some(1));
        assert_eq!(verified.fields["domain"], "iq.wiki");
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = token(&SignOptions::new().expiration_time(now() - Duration::seconds(1)));
        let result = verifier_at(now()).verify(&token, &VerifyOptions::new());
        assert!(matches!(result, Err(TokenError::Expired { .. })));
    }

    #[test]
    fn token_is_valid_until_expiry_instant() {
        let token = token(&SignOptions::expiring_in("1h"));
        let at_expiry = now() + Duration::hours(1);
        assert!(verifier_at(at_expiry).verify(&token, &VerifyOptions::new()).is_ok());
        let after = at_expiry + Duration::milliseconds(1);
        assert!(verifier_at(after).verify(&token, &VerifyOptions::new()).is_err());
    }

    #[test]
    fn future_not_before_is_rejected() {
        let token = token(&SignOptions::new().not_before(now() + Duration::hours(1)));
        let result = verifier_at(now()).verify(&token, &VerifyOptions::new());
        assert!(matches!(result, Err(TokenError::NotYetValid { .. })));
    }

    #[test]
    fn domain_mismatch_is_rejected() {
        let token = token(&SignOptions::new().domain("iq.wiki"));
        let result = verifier_at(now()).verify(&token, &VerifyOptions::new().domain("other.domain"));
        assert!(matches!(result, Err(TokenError::DomainMismatch { .. })));
    }

    #[test]
    fn legacy_version_is_rejected_before_parsing() {
        let token = wrap("Web3 Token Version: 1", "0x01");
        let result = verifier_at(now()).verify(&token, &VerifyOptions::new());
        assert!(matches!(
            result,
            Err(TokenError::UnsupportedVersion { version: 1 })
        ));
    }

    #[test]
    fn body_without_expiry_is_malformed() {
        let token = wrap("Web3 Token Version: 2\nIssued At: 2024-05-17T12:00:00.000Z", "0x01");
        let result = verifier_at(now()).verify(&token, &VerifyOptions::new());
        assert!(matches!(result, Err(TokenError::MalformedBody { .. })));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let result = verify("MALFORMED_TOKEN", &StaticRecovery, &VerifyOptions::new());
        assert!(matches!(
            result,
            Err(TokenError::MalformedToken(MalformedTokenKind::NotBase64))
        ));
    }

    #[test]
    fn decrypt_skips_validity_checks() {
        let token = token(&SignOptions::new().expiration_time(now() - Duration::days(1)));
        let decrypted = verifier_at(now()).decrypt(&token).unwrap();
        assert_eq!(decrypted.version, 2);
        assert_eq!(decrypted.address, ADDRESS.to_lowercase());
    }
}

//! Token issuer.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::account::MessageSigner;
use crate::claims::TokenClaims;
use crate::clock::{Clock, SystemClock};
use crate::codec::{is_hex_signature, wrap};
use crate::error::TokenError;
use crate::message::build_message;
use crate::nonce::{NonceSource, RandomNonce};
use crate::options::SignOptions;
use crate::validation::{validate_claims, validate_options};

/// Creates tokens by having an account sign the canonical message.
///
/// The issuer owns a signing capability and reads time and nonces through
/// injectable providers, defaulting to the system clock and the thread-local
/// random generator.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use web3_token::{FixedClock, FixedNonce, Issuer, SignOptions, SigningError};
///
/// let signer = |_: &str| -> Result<String, SigningError> { Ok("0x1234".into()) };
/// let issuer = Issuer::new(signer)
///     .with_clock(FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
///     .with_nonce_source(FixedNonce(42));
///
/// let token = issuer.sign(&SignOptions::new().domain("iq.wiki").with_nonce(true))?;
/// assert!(!token.is_empty());
/// # Ok::<(), web3_token::TokenError>(())
/// ```
pub struct Issuer<S> {
    signer: S,
    clock: Arc<dyn Clock>,
    nonces: Arc<dyn NonceSource>,
}

impl<S: MessageSigner> Issuer<S> {
    /// Creates an issuer using the system clock and random nonces.
    #[must_use]
    pub fn new(signer: S) -> Self {
        Self {
            signer,
            clock: Arc::new(SystemClock),
            nonces: Arc::new(RandomNonce),
        }
    }

    /// Replaces the clock used for `Issued At` and relative expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replaces the nonce source.
    #[must_use]
    pub fn with_nonce_source(mut self, nonces: impl NonceSource + 'static) -> Self {
        self.nonces = Arc::new(nonces);
        self
    }

    /// Returns the signing capability.
    #[must_use]
    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Validates options, derives claims and signs them.
    ///
    /// # Errors
    ///
    /// - `TokenError::Validation` if an option fails structural checks
    /// - `TokenError::Argument` if `expires_in` cannot be resolved or the
    ///   signer returns something other than a hex signature
    /// - `TokenError::Signing` if the signer fails
    pub fn sign(&self, options: &SignOptions) -> Result<String, TokenError> {
        validate_options(options)?;
        let claims = TokenClaims::from_options(options, self.clock.as_ref(), self.nonces.as_ref())?;
        self.sign_claims(&claims)
    }

    /// Signs already-derived claims.
    ///
    /// Option processing (expiry resolution, nonce generation, domain and URI
    /// shape checks) is skipped, but the claims must still render to a message
    /// that reads back as the same claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Validation` if a text claim would be misread once
    /// rendered (see [`validate_claims`](crate::validate_claims)),
    /// `TokenError::Signing` if the signer fails, or `TokenError::Argument`
    /// if it returns something other than a hex signature.
    pub fn sign_claims(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        sign_with(&self.signer, claims)
    }
}

impl<S> fmt::Debug for Issuer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Issuer").finish_non_exhaustive()
    }
}

/// Signs a token with the system clock and random nonces.
///
/// # Errors
///
/// See [`Issuer::sign`].
///
/// ```
/// use web3_token::{sign, SignOptions, SigningError};
///
/// let signer = |_: &str| -> Result<String, SigningError> { Ok("0xbeef".into()) };
/// let token = sign(&signer, &SignOptions::expiring_in("1d"))?;
/// assert!(!token.is_empty());
///
/// let bad_signer = |_: &str| -> Result<String, SigningError> { Ok("not hex".into()) };
/// assert!(sign(&bad_signer, &SignOptions::new()).is_err());
/// # Ok::<(), web3_token::TokenError>(())
/// ```
pub fn sign<S>(signer: &S, options: &SignOptions) -> Result<String, TokenError>
where
    S: MessageSigner + ?Sized,
{
    validate_options(options)?;
    let claims = TokenClaims::from_options(options, &SystemClock, &RandomNonce)?;
    sign_with(signer, &claims)
}

fn sign_with<S>(signer: &S, claims: &TokenClaims) -> Result<String, TokenError>
where
    S: MessageSigner + ?Sized,
{
    validate_claims(claims)?;
    let message = build_message(claims);
    let signature = signer.sign_message(&message)?;

    if !is_hex_signature(&signature) {
        return Err(TokenError::Argument {
            reason: "\"signer\" should return a signature string".to_string(),
        });
    }

    debug!(
        domain = claims.domain.as_deref(),
        nonce = claims.nonce,
        expiration_time = %claims.expiration_time,
        "issued token"
    );

    Ok(wrap(&message, &signature))
}

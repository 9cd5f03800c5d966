//! Token envelope encoding and decoding.
//!
//! A token is the standard-alphabet, padded base64 encoding of the UTF-8 JSON
//! object `{"signature": <hex>, "body": <message>}`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::account::AddressRecovery;
use crate::error::{MalformedTokenKind, TokenError};

#[derive(Serialize)]
struct WireEnvelopeRef<'a> {
    signature: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct WireEnvelope {
    signature: String,
    body: String,
}

/// A structurally valid token whose signer has not been recovered yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Canonical message text
    pub body: String,
    /// Signature as carried on the wire
    pub signature: String,
    /// Decoded signature bytes
    pub signature_bytes: Vec<u8>,
    /// Protocol version declared in the body
    pub version: u32,
}

/// A decoded token with its recovered signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedToken {
    /// Protocol version declared in the body
    pub version: u32,
    /// Lower-cased signer address
    pub address: String,
    /// Canonical message text
    pub body: String,
    /// Signature as carried on the wire
    pub signature: String,
}

/// Wraps a signed message into a token string.
///
/// ```
/// use web3_token::{unwrap_envelope, wrap};
///
/// let token = wrap("Web3 Token Version: 2", "0xabcd");
/// let envelope = unwrap_envelope(&token)?;
/// assert_eq!(envelope.body, "Web3 Token Version: 2");
/// assert_eq!(envelope.signature_bytes, vec![0xab, 0xcd]);
/// # Ok::<(), web3_token::TokenError>(())
/// ```
#[must_use]
pub fn wrap(body: &str, signature: &str) -> String {
    let envelope = WireEnvelopeRef { signature, body };
    // Serializing two string fields into a Vec cannot fail.
    let json = serde_json::to_vec(&envelope).unwrap_or_default();
    STANDARD.encode(json)
}

/// Decodes and structurally checks a token without recovering its signer.
///
/// # Errors
///
/// Returns `TokenError::MalformedToken` naming the first failed step: empty
/// input, bad base64 or UTF-8, bad JSON, empty body, empty signature,
/// non-hex signature, or no version header.
pub fn unwrap_envelope(token: &str) -> Result<Envelope, TokenError> {
    if token.is_empty() {
        return Err(malformed(MalformedTokenKind::Empty));
    }

    let decoded = STANDARD
        .decode(token)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| malformed(MalformedTokenKind::NotBase64))?;

    let WireEnvelope { signature, body } = serde_json::from_str(&decoded)
        .map_err(|_| malformed(MalformedTokenKind::Unparseable))?;

    if body.is_empty() {
        return Err(malformed(MalformedTokenKind::EmptyBody));
    }
    if signature.is_empty() {
        return Err(malformed(MalformedTokenKind::EmptySignature));
    }

    let signature_bytes = decode_signature(&signature)
        .ok_or_else(|| malformed(MalformedTokenKind::InvalidSignature))?;

    let version = scan_version(&body).ok_or_else(|| malformed(MalformedTokenKind::MissingVersion))?;

    trace!(version, body_len = body.len(), "unwrapped token envelope");

    Ok(Envelope {
        body,
        signature,
        signature_bytes,
        version,
    })
}

/// Decodes a token and recovers the address that signed it.
///
/// No expiry, not-before or domain checks are made; see
/// [`Verifier`](crate::Verifier) for that.
///
/// # Errors
///
/// Returns `TokenError::MalformedToken` if the envelope is rejected by
/// [`unwrap_envelope`], or `TokenError::Signing` if recovery fails.
pub fn decrypt<R>(token: &str, recovery: &R) -> Result<DecryptedToken, TokenError>
where
    R: AddressRecovery + ?Sized,
{
    let Envelope {
        body,
        signature,
        signature_bytes,
        version,
    } = unwrap_envelope(token)?;

    let address = recovery
        .recover_address(&body, &signature_bytes)?
        .to_lowercase();

    debug!(%address, version, "decrypted token");

    Ok(DecryptedToken {
        version,
        address,
        body,
        signature,
    })
}

/// Returns true if `signature` is non-empty hex with an optional `0x` prefix.
pub(crate) fn is_hex_signature(signature: &str) -> bool {
    decode_signature(signature).is_some_and(|bytes| !bytes.is_empty())
}

fn decode_signature(signature: &str) -> Option<Vec<u8>> {
    let digits = signature.strip_prefix("0x").unwrap_or(signature);
    hex::decode(digits).ok()
}

/// Finds the first `Web3 Token Version: <digit>` header, allowing any run of
/// spaces or hyphens between the words.
pub(crate) fn scan_version(body: &str) -> Option<u32> {
    body.match_indices("Web3")
        .find_map(|(start, word)| version_after(&body[start + word.len()..]))
}

fn version_after(rest: &str) -> Option<u32> {
    let rest = skip_separators(rest)?.strip_prefix("Token")?;
    let rest = skip_separators(rest)?.strip_prefix("Version: ")?;
    rest.chars().next()?.to_digit(10)
}

fn skip_separators(text: &str) -> Option<&str> {
    let rest = text.trim_start_matches(|c: char| c.is_whitespace() || c == '-');
    (rest.len() < text.len()).then_some(rest)
}

const fn malformed(kind: MalformedTokenKind) -> TokenError {
    TokenError::MalformedToken(kind)
}

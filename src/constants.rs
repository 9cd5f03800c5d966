//! Constants for the canonical message format.

/// Protocol version written into every new token.
pub const TOKEN_VERSION: &str = "2";

/// Oldest protocol version the verifier accepts.
pub const MIN_SUPPORTED_VERSION: u32 = 2;

/// Suffix of the domain banner line.
pub const DOMAIN_BANNER_SUFFIX: &str = " wants you to sign in with your Ethereum account.";

/// Expiry applied when neither `expiration_time` nor `expires_in` is given.
pub const DEFAULT_EXPIRES_IN: &str = "1d";

/// Exclusive upper bound for generated nonces.
pub const NONCE_UPPER_BOUND: u64 = 99_999_999;

/// Header label for the URI claim.
pub const LABEL_URI: &str = "URI";

/// Header label for the protocol version.
pub const LABEL_VERSION: &str = "Web3 Token Version";

/// Header label for the chain id claim.
pub const LABEL_CHAIN_ID: &str = "Chain ID";

/// Header label for the nonce claim.
pub const LABEL_NONCE: &str = "Nonce";

/// Header label for the issue instant.
pub const LABEL_ISSUED_AT: &str = "Issued At";

/// Header label for the expiry instant.
pub const LABEL_EXPIRATION_TIME: &str = "Expiration Time";

/// Header label for the activation instant.
pub const LABEL_NOT_BEFORE: &str = "Not Before";

/// Header label for the request id claim.
pub const LABEL_REQUEST_ID: &str = "Request ID";

/// Normalized header keys that every body must carry.
pub const REQUIRED_HEADERS: [&str; 3] = ["issued-at", "expiration-time", "web3-token-version"];

/// Milliseconds in one day.
pub const MS_PER_DAY: u64 = 86_400_000;

/// Milliseconds in one hour.
pub const MS_PER_HOUR: u64 = 3_600_000;

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: u64 = 60_000;

/// Milliseconds in one second.
pub const MS_PER_SECOND: u64 = 1_000;

//! Claim extraction from the sections of a canonical message.
//!
//! The domain and statement carry no header label, so they are recovered by
//! position: the banner is the last line of the first group, and the
//! statement is the lone line of the group preceding the header block.

use std::collections::BTreeMap;

use crate::constants::{DOMAIN_BANNER_SUFFIX, REQUIRED_HEADERS};
use crate::error::TokenError;
use crate::sections::{normalize_header_keys, parse_headers, split_sections};

/// Reads the domain from the banner line of the first group.
///
/// Returns `None` if the first group is empty or its last line is not a
/// banner.
#[must_use]
pub fn extract_domain(sections: &[Vec<&str>]) -> Option<String> {
    let banner = sections.first()?.last()?;
    let domain = banner.strip_suffix(DOMAIN_BANNER_SUFFIX)?.trim();
    (!domain.is_empty()).then(|| domain.to_string())
}

/// Reads the statement by position.
///
/// With two groups and no domain the statement is the first line of the
/// first group; with three groups it is the first line of the second group.
/// Any other layout carries no statement.
#[must_use]
pub fn extract_statement(sections: &[Vec<&str>], domain: Option<&str>) -> Option<String> {
    let group = match (sections.len(), domain) {
        (2, None) => sections.first(),
        (3, _) => sections.get(1),
        _ => None,
    }?;
    group.first().map(|line| (*line).to_string())
}

/// Parses canonical message lines into a `snake_case` claim mapping.
///
/// The last group is read as the header block. Keys are normalized
/// (`Issued At` becomes `issued_at`) and the extracted `domain` and
/// `statement` are added when present.
///
/// # Errors
///
/// Returns `TokenError::MalformedBody` if `Issued At`, `Expiration Time` or
/// `Web3 Token Version` is missing.
///
/// # Example
///
/// ```
/// use web3_token::parse_body;
///
/// let body = "iq.wiki wants you to sign in with your Ethereum account.\n\
///             \n\
///             Web3 Token Version: 2\n\
///             Issued At: 2024-01-01T00:00:00.000Z\n\
///             Expiration Time: 2024-01-02T00:00:00.000Z";
///
/// let fields = parse_body(body.split('\n'))?;
/// assert_eq!(fields["domain"], "iq.wiki");
/// assert_eq!(fields["web3_token_version"], "2");
/// assert!(!fields.contains_key("statement"));
/// # Ok::<(), web3_token::TokenError>(())
/// ```
pub fn parse_body<'a, I>(lines: I) -> Result<BTreeMap<String, String>, TokenError>
where
    I: IntoIterator<Item = &'a str>,
{
    let sections = split_sections(lines);
    let header_block = sections.last().map(|group| group.join("\n")).unwrap_or_default();

    let headers: BTreeMap<String, String> = normalize_header_keys(parse_headers(&header_block))
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect();

    if let Some(missing) = REQUIRED_HEADERS.iter().find(|h| !headers.contains_key(**h)) {
        return Err(TokenError::MalformedBody {
            reason: format!("'{missing}' header is required"),
        });
    }

    let mut fields: BTreeMap<String, String> = headers
        .into_iter()
        .map(|(key, value)| (key.replace('-', "_"), value))
        .collect();

    let domain = extract_domain(&sections);
    if let Some(statement) = extract_statement(&sections, domain.as_deref()) {
        fields.insert("statement".to_string(), statement);
    }
    if let Some(domain) = domain {
        fields.insert("domain".to_string(), domain);
    }

    Ok(fields)
}

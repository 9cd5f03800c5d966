//! Section and header parsing for canonical message text.

use std::collections::BTreeMap;

/// Splits message lines into blank-line-delimited groups.
///
/// Every empty line opens a new, initially empty group and is not kept as
/// content. At least one group is always returned.
///
/// # Examples
///
/// ```
/// use web3_token::split_sections;
///
/// let sections = split_sections("a\n\nb\n\nc".split('\n'));
/// assert_eq!(sections, vec![vec!["a"], vec!["b"], vec!["c"]]);
///
/// let sections = split_sections("a\nb".split('\n'));
/// assert_eq!(sections, vec![vec!["a", "b"]]);
/// ```
#[must_use]
pub fn split_sections<'a, I>(lines: I) -> Vec<Vec<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sections: Vec<Vec<&'a str>> = vec![Vec::new()];
    for line in lines {
        if line.is_empty() {
            sections.push(Vec::new());
        } else if let Some(current) = sections.last_mut() {
            current.push(line);
        }
    }
    sections
}

/// Parses `Key: value` lines into a map.
///
/// Each line is split on its first colon and both sides are trimmed. Lines
/// without a colon are ignored; a repeated key keeps its last value.
///
/// ```
/// use web3_token::parse_headers;
///
/// let headers = parse_headers("Issued At: 2024-01-01T00:00:00.000Z\nnoise");
/// assert_eq!(headers.get("Issued At").map(String::as_str), Some("2024-01-01T00:00:00.000Z"));
/// assert_eq!(headers.len(), 1);
/// ```
#[must_use]
pub fn parse_headers(text: &str) -> BTreeMap<String, String> {
    text.split('\n')
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

/// Rewrites space-separated header keys to hyphenated keys.
///
/// ```
/// use web3_token::{normalize_header_keys, parse_headers};
///
/// let headers = normalize_header_keys(parse_headers("Web3 Token Version: 2"));
/// assert!(headers.contains_key("Web3-Token-Version"));
/// ```
#[must_use]
pub fn normalize_header_keys(headers: BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .into_iter()
        .map(|(key, value)| (key.replace(' ', "-"), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_blank_lines_is_one_group() {
        let sections = split_sections(["a", "b", "c"]);
        assert_eq!(sections, vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn empty_input_is_one_empty_group() {
        let sections = split_sections(std::iter::empty());
        assert_eq!(sections, vec![Vec::<&str>::new()]);
    }

    #[test]
    fn three_groups() {
        let sections = split_sections("a\n\nb\n\nc".split('\n'));
        assert_eq!(sections, vec![vec!["a"], vec!["b"], vec!["c"]]);
    }

    #[test]
    fn consecutive_blank_lines_open_empty_groups() {
        let sections = split_sections(["a", "", "", "b"]);
        assert_eq!(sections, vec![vec!["a"], vec![], vec!["b"]]);
    }

    #[test]
    fn leading_blank_line_leaves_first_group_empty() {
        let sections = split_sections(["", "a"]);
        assert_eq!(sections, vec![vec![], vec!["a"]]);
    }

    #[test]
    fn headers_split_on_first_colon_only() {
        let headers = parse_headers("URI: https://iq.wiki:443/login");
        assert_eq!(
            headers.get("URI").map(String::as_str),
            Some("https://iq.wiki:443/login")
        );
    }

    #[test]
    fn headers_trim_both_sides() {
        let headers = parse_headers("  Nonce  :   42  ");
        assert_eq!(headers.get("Nonce").map(String::as_str), Some("42"));
    }

    #[test]
    fn later_duplicate_wins() {
        let headers = parse_headers("Nonce: 1\nNonce: 2");
        assert_eq!(headers.get("Nonce").map(String::as_str), Some("2"));
    }

    #[test]
    fn normalize_leaves_hyphenated_keys() {
        let headers = normalize_header_keys(parse_headers("Issued-At: x\nNot Before: y"));
        assert!(headers.contains_key("Issued-At"));
        assert!(headers.contains_key("Not-Before"));
    }
}

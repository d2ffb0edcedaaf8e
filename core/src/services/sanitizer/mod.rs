//! Input sanitizer for write-path text and search keywords
//!
//! Detection here is signature based. It narrows what reaches storage but is not
//! an injection defense by itself: the data-access layer must still bind every
//! value as a query parameter.

mod patterns;


use std::net::IpAddr;

use tracing::warn;

use ag_shared::utils::masking::{snippet, LOG_SNIPPET_CHARS};

use crate::domain::value_objects::{SanitizedText, SearchKeyword};
use crate::errors::SecurityViolation;

use patterns::{SEARCH_ALLOW_LIST, SQL_KEYWORD_PATTERN, XSS_PATTERN};

/// Longest search keyword kept, in characters
pub const MAX_SEARCH_KEYWORD_CHARS: usize = 100;

/// Longest user agent kept, in characters
pub const MAX_USER_AGENT_CHARS: usize = 512;

/// Whether the text carries a script-injection signature
pub fn contains_xss(input: &str) -> bool {
    XSS_PATTERN.is_match(input)
}

/// Whether the text contains an SQL statement keyword
pub fn contains_sql_keyword(input: &str) -> bool {
    SQL_KEYWORD_PATTERN.is_match(input)
}

/// Rejects script-shaped input and HTML-encodes the rest
///
/// # Arguments
///
/// * `input` - Raw user text
/// * `max_chars` - Upper bound on the encoded result, in characters
///
/// # Returns
///
/// * `Ok(SanitizedText)` - The HTML-encoded trimmed input; empty for blank input
/// * `Err(SecurityViolation::XssDetected)` - A script signature matched
/// * `Err(SecurityViolation::InputTooLong)` - The encoded text exceeds `max_chars`
pub fn sanitize_rich_text(input: &str, max_chars: usize) -> Result<SanitizedText, SecurityViolation> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(SanitizedText::new(String::new()));
    }

    if contains_xss(trimmed) {
        warn!(input = %snippet(trimmed, LOG_SNIPPET_CHARS), "Script injection attempt rejected");
        return Err(SecurityViolation::XssDetected);
    }

    let encoded = encode_html(trimmed);
    if encoded.chars().count() > max_chars {
        return Err(SecurityViolation::InputTooLong { max: max_chars });
    }

    Ok(SanitizedText::new(encoded))
}

/// Normalizes a search keyword for a LIKE query
///
/// Blank input yields the empty keyword. Longer input is cut to
/// [`MAX_SEARCH_KEYWORD_CHARS`] before any check runs.
///
/// # Returns
///
/// * `Ok(SearchKeyword)` - Allow-listed text with LIKE metacharacters escaped
/// * `Err(SecurityViolation::SqlInjectionDetected)` - An SQL keyword matched
/// * `Err(SecurityViolation::DisallowedCharacters)` - A character outside the allow-list
pub fn sanitize_search_keyword(input: &str) -> Result<SearchKeyword, SecurityViolation> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(SearchKeyword::empty());
    }

    let keyword: String = trimmed.chars().take(MAX_SEARCH_KEYWORD_CHARS).collect();

    if contains_sql_keyword(&keyword) {
        warn!(keyword = %snippet(&keyword, LOG_SNIPPET_CHARS), "SQL keyword in search rejected");
        return Err(SecurityViolation::SqlInjectionDetected);
    }

    if !SEARCH_ALLOW_LIST.is_match(&keyword) {
        warn!(keyword = %snippet(&keyword, LOG_SNIPPET_CHARS), "Disallowed characters in search rejected");
        return Err(SecurityViolation::DisallowedCharacters);
    }

    Ok(SearchKeyword::new(escape_like_pattern(&keyword)))
}

/// Escapes LIKE metacharacters with `\`; apply exactly once per query
pub fn escape_like_pattern(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '\\' | '%' | '_' | '[' | ']' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Encodes the HTML-significant characters `& < > " '`
pub fn encode_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Returns the trimmed address when it is IPv4 or IPv6
///
/// Blank input gives `"unknown"`, anything unparseable gives `"invalid"`.
pub fn sanitize_ip_address(ip: &str) -> String {
    let clean = ip.trim();
    if clean.is_empty() {
        return "unknown".to_string();
    }
    match clean.parse::<IpAddr>() {
        Ok(_) => clean.to_string(),
        Err(_) => {
            warn!(ip = %snippet(clean, LOG_SNIPPET_CHARS), "Invalid IP address");
            "invalid".to_string()
        }
    }
}

/// Caps a user agent at [`MAX_USER_AGENT_CHARS`] and strips `<>"'&`
pub fn sanitize_user_agent(user_agent: &str) -> String {
    if user_agent.trim().is_empty() {
        return "unknown".to_string();
    }
    user_agent
        .chars()
        .take(MAX_USER_AGENT_CHARS)
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | '&'))
        .collect()
}

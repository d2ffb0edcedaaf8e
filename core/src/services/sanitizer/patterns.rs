//! Compiled signature patterns

use once_cell::sync::Lazy;
use regex::Regex;

/// Script tags, `javascript:` URIs, inline event handlers, iframe/object/embed tags
pub(super) static XSS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<\s*script\b|javascript\s*:|\bon\w+\s*=|<\s*iframe|<\s*object|<\s*embed")
        .expect("XSS pattern is valid")
});

/// SQL statement keywords as whole words
pub(super) static SQL_KEYWORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|DROP|CREATE|ALTER|EXEC|UNION|SCRIPT)\b")
        .expect("SQL keyword pattern is valid")
});

/// Letters and digits of any script, whitespace and `-_.,!?()[]%`
pub(super) static SEARCH_ALLOW_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\p{M}\p{Nd}\s\-_.,!?()\[\]%]*$").expect("search allow-list is valid")
});

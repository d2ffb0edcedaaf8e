//! Values that can only be produced by the input sanitizer

use serde::Serialize;
use std::fmt;

/// HTML-encoded text that passed the script-injection check and a length bound
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SanitizedText(String);

impl SanitizedText {
    pub(crate) fn new(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SanitizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SanitizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Allow-listed search term with LIKE metacharacters escaped exactly once
///
/// Escape with `\`, so queries must declare `ESCAPE '\'`. Bind this value as a
/// parameter; it is not a substitute for parameterized queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SearchKeyword(String);

impl SearchKeyword {
    pub(crate) fn new(escaped: String) -> Self {
        Self(escaped)
    }

    /// The empty keyword, meaning "no filter"
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `%keyword%` for a contains-match
    pub fn contains_pattern(&self) -> String {
        format!("%{}%", self.0)
    }
}

impl fmt::Display for SearchKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SearchKeyword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

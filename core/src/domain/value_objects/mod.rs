//! Value objects representing immutable domain concepts.

pub mod sanitized;
pub mod session;

// Re-export commonly used types
pub use sanitized::{SanitizedText, SearchKeyword};
pub use session::SessionState;

pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;
pub mod noop;

pub use memory::{InMemoryRevocationGate, DEFAULT_MAX_ENTRIES};
pub use noop::NoopRevocationGate;
pub use r#trait::RevocationGate;

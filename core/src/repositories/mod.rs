pub mod revocation;

pub use revocation::{InMemoryRevocationGate, NoopRevocationGate, RevocationGate};

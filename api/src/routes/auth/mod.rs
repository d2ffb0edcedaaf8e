//! Authentication route handlers
//!
//! Login is handled elsewhere; this service only keeps sessions alive and ends them:
//! - Token refresh
//! - Logout

pub mod logout;
pub mod refresh;

//! Session state derived from the presented access token

use crate::domain::entities::token::Claims;

/// Where a client stands with respect to its access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The access token is valid; requests proceed with these claims
    ActiveAccess(Claims),
    /// The access token is well-signed but expired; the client must refresh
    NeedsRefresh,
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::ActiveAccess(_))
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            SessionState::ActiveAccess(claims) => Some(claims),
            SessionState::NeedsRefresh => None,
        }
    }
}

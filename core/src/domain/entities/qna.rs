//! Q&A board post state
//!
//! Posts are immutable values. Every change is a transition that consumes the
//! current value and returns the next one, so a stale copy can never be
//! half-updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

/// Board a post belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// General inquiry
    General,
    /// Abuse or incident report
    Report,
}

/// Whether staff have replied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    Pending,
    Answered,
}

impl Default for AnswerStatus {
    fn default() -> Self {
        AnswerStatus::Pending
    }
}

/// Caller role as decoded from the authenticated identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A Q&A post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QnaPost {
    pub id: i64,
    pub owner_id: i64,
    pub category: Category,
    pub title: String,
    pub content: String,
    pub image_path: Option<String>,
    pub is_locked: bool,
    pub answer_status: AnswerStatus,
    pub view_count: u32,
    pub created_at: DateTime<Utc>,
}

impl QnaPost {
    /// Creates a new post; posts start locked and unanswered
    pub fn new(
        id: i64,
        owner_id: i64,
        category: Category,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            category,
            title: title.into(),
            content: content.into(),
            image_path: None,
            is_locked: true,
            answer_status: AnswerStatus::Pending,
            view_count: 0,
            created_at,
        }
    }

    pub fn with_image(self, image_path: impl Into<String>) -> Self {
        Self {
            image_path: Some(image_path.into()),
            ..self
        }
    }

    pub fn with_lock(self, is_locked: bool) -> Self {
        Self { is_locked, ..self }
    }

    /// A reply was posted
    pub fn answered(self) -> Self {
        Self {
            answer_status: AnswerStatus::Answered,
            ..self
        }
    }

    /// A reply was deleted; the post falls back to pending when none remain
    pub fn reply_removed(self, remaining_replies: u64) -> Self {
        if remaining_replies == 0 {
            Self {
                answer_status: AnswerStatus::Pending,
                ..self
            }
        } else {
            self
        }
    }

    pub fn increment_views(self) -> Self {
        Self {
            view_count: self.view_count.saturating_add(1),
            ..self
        }
    }

    pub fn is_owner(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }

    /// Admins see everything, unlocked posts are public, locked posts are owner-only
    pub fn can_view(&self, viewer_id: Option<i64>, role: Role) -> bool {
        if role.is_admin() || !self.is_locked {
            return true;
        }
        viewer_id.map(|id| self.is_owner(id)).unwrap_or(false)
    }

    /// Owner or admin
    pub fn can_modify(&self, user_id: i64, role: Role) -> bool {
        role.is_admin() || self.is_owner(user_id)
    }

    /// Opens the post for a viewer, counting the view unless the viewer owns it
    ///
    /// # Returns
    ///
    /// * `Ok(QnaPost)` - The post after the view was recorded
    /// * `Err(AuthError::InsufficientPermissions)` - The post is locked for this viewer
    pub fn view_by(self, viewer_id: Option<i64>, role: Role) -> Result<Self, AuthError> {
        if !self.can_view(viewer_id, role) {
            return Err(AuthError::InsufficientPermissions);
        }
        let own_post = viewer_id.map(|id| self.is_owner(id)).unwrap_or(false);
        Ok(if own_post { self } else { self.increment_views() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> QnaPost {
        QnaPost::new(1, 7, Category::General, "title", "body", Utc::now())
    }

    #[test]
    fn test_new_post_defaults() {
        let p = post();
        assert!(p.is_locked);
        assert_eq!(p.answer_status, AnswerStatus::Pending);
        assert_eq!(p.view_count, 0);
    }

    #[test]
    fn test_answer_transitions() {
        let p = post().answered();
        assert_eq!(p.answer_status, AnswerStatus::Answered);

        let still_answered = p.clone().reply_removed(2);
        assert_eq!(still_answered.answer_status, AnswerStatus::Answered);

        let pending = p.reply_removed(0);
        assert_eq!(pending.answer_status, AnswerStatus::Pending);
    }

    #[test]
    fn test_locked_post_visibility() {
        let p = post();
        assert!(p.can_view(Some(7), Role::User));
        assert!(!p.can_view(Some(8), Role::User));
        assert!(!p.can_view(None, Role::User));
        assert!(p.can_view(Some(8), Role::Admin));
        assert!(p.clone().with_lock(false).can_view(None, Role::User));
    }

    #[test]
    fn test_view_by_counts_other_viewers_only() {
        let p = post().with_lock(false);
        let p = p.view_by(Some(7), Role::User).unwrap();
        assert_eq!(p.view_count, 0);
        let p = p.view_by(Some(8), Role::User).unwrap();
        assert_eq!(p.view_count, 1);
        let p = p.view_by(None, Role::User).unwrap();
        assert_eq!(p.view_count, 2);
    }

    #[test]
    fn test_view_by_rejects_locked() {
        let err = post().view_by(Some(8), Role::User).unwrap_err();
        assert_eq!(err, AuthError::InsufficientPermissions);
    }

    #[test]
    fn test_category_serialization() {
        assert_eq!(serde_json::to_string(&Category::Report).unwrap(), "\"report\"");
        assert_eq!(serde_json::to_string(&AnswerStatus::Answered).unwrap(), "\"answered\"");
    }
}

//! Topic model for Corkboard.

use serde::Serialize;

/// Maximum length of a topic subject, in characters.
pub const MAX_SUBJECT_LENGTH: usize = 255;

/// Topic entity: a discussion thread on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Topic {
    /// Unique topic ID.
    pub id: i64,
    /// Topic subject line.
    pub subject: String,
    /// Board this topic belongs to.
    pub board_id: i64,
    /// User who started the topic.
    pub starter_id: i64,
    /// Number of times the post listing was rendered.
    pub views: i64,
    /// Creation timestamp.
    pub created_at: String,
}

/// Data for creating a bare topic in tests.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct NewTopic {
    /// Board to create the topic on.
    pub board_id: i64,
    /// Starting user.
    pub starter_id: i64,
    /// Subject line.
    pub subject: String,
}

#[cfg(test)]
impl NewTopic {
    /// Create a new topic.
    pub fn new(board_id: i64, starter_id: i64, subject: impl Into<String>) -> Self {
        Self {
            board_id,
            starter_id,
            subject: subject.into(),
        }
    }
}

/// A topic as shown in a board's topic listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TopicSummary {
    /// Unique topic ID.
    pub id: i64,
    /// Topic subject line.
    pub subject: String,
    /// Username of the starter.
    pub starter: String,
    /// Number of replies (posts minus the opening post).
    pub replies: i64,
    /// View counter.
    pub views: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Creation time of the newest post in the topic.
    pub last_updated: String,
}

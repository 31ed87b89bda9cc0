//! Post model for Corkboard.

use serde::Serialize;

/// Maximum length of a post message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Post entity representing a message in a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Post message.
    pub message: String,
    /// Topic this post belongs to.
    pub topic_id: i64,
    /// Author.
    pub created_by: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Last editor, if the post was edited.
    pub updated_by: Option<i64>,
    /// Last edit timestamp, if the post was edited.
    pub updated_at: Option<String>,
}

impl Post {
    /// Check if this post has ever been edited.
    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }
}

/// A post as shown in a topic's post listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PostView {
    /// Unique post ID.
    pub id: i64,
    /// Post message.
    pub message: String,
    /// Author ID.
    pub created_by: i64,
    /// Author username.
    pub author: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last editor username, if edited.
    pub editor: Option<String>,
    /// Last edit timestamp, if edited.
    pub updated_at: Option<String>,
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Topic to post in.
    pub topic_id: i64,
    /// Author.
    pub created_by: i64,
    /// Post message.
    pub message: String,
}

impl NewPost {
    /// Create a new post.
    pub fn new(topic_id: i64, created_by: i64, message: impl Into<String>) -> Self {
        Self {
            topic_id,
            created_by,
            message: message.into(),
        }
    }
}

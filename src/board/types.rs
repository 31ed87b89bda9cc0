//! Board model for Corkboard.

use serde::Serialize;

/// Maximum length of a board name, in characters.
pub const MAX_BOARD_NAME_LENGTH: usize = 25;

/// Maximum length of a board description, in characters.
pub const MAX_BOARD_DESCRIPTION_LENGTH: usize = 100;

/// Board entity representing a discussion board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID.
    pub id: i64,
    /// Board name (unique).
    pub name: String,
    /// Board description.
    pub description: String,
}

/// Data for creating a new board.
#[derive(Debug, Clone)]
pub struct NewBoard {
    /// Board name.
    pub name: String,
    /// Board description.
    pub description: String,
}

impl NewBoard {
    /// Create a new board with no description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// The most recent post on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastPost {
    /// Topic the post belongs to.
    pub topic_id: i64,
    /// Post creation timestamp.
    pub created_at: String,
    /// Username of the author.
    pub author: String,
}

/// A board annotated with activity counters for the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    /// Unique board ID.
    pub id: i64,
    /// Board name.
    pub name: String,
    /// Board description.
    pub description: String,
    /// Number of topics on the board.
    pub topics_count: i64,
    /// Number of posts across all topics on the board.
    pub posts_count: i64,
    /// Most recent post, if any.
    pub last_post: Option<LastPost>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_builder() {
        let board = NewBoard::new("Django").with_description("This is a board about Django.");
        assert_eq!(board.name, "Django");
        assert_eq!(board.description, "This is a board about Django.");
    }

    #[test]
    fn test_new_board_default_description() {
        assert_eq!(NewBoard::new("Python").description, "");
    }
}

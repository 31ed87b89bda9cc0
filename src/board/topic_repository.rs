//! Topic repository for Corkboard.

use super::pagination::PageRequest;
use super::topic::{Topic, TopicSummary};
use crate::db::DbPool;
use crate::Result;
#[cfg(test)]
use super::topic::NewTopic;
#[cfg(test)]
use crate::ForumError;

/// Repository for topic operations.
pub struct TopicRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> TopicRepository<'a> {
    /// Create a new TopicRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a topic on its own, without an opening post.
    ///
    /// Test fixture only. Real topics come from `ForumService::start_topic`,
    /// which writes the topic and its first post together.
    #[cfg(test)]
    pub(crate) async fn create(&self, new_topic: &NewTopic) -> Result<Topic> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO topics (subject, board_id, starter_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_topic.subject)
        .bind(new_topic.board_id)
        .bind(new_topic.starter_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ForumError::NotFound("topic".to_string()))
    }

    /// Get a topic by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Topic>> {
        let topic = sqlx::query_as::<_, Topic>(
            "SELECT id, subject, board_id, starter_id, views, created_at
             FROM topics WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(topic)
    }

    /// Get a topic by ID, only if it belongs to the given board.
    pub async fn get_in_board(&self, board_id: i64, topic_id: i64) -> Result<Option<Topic>> {
        let topic = sqlx::query_as::<_, Topic>(
            "SELECT id, subject, board_id, starter_id, views, created_at
             FROM topics WHERE id = ? AND board_id = ?",
        )
        .bind(topic_id)
        .bind(board_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(topic)
    }

    /// Count topics on a board.
    pub async fn count_by_board(&self, board_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics WHERE board_id = ?")
            .bind(board_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// List one page of a board's topics, newest first.
    pub async fn list_by_board(
        &self,
        board_id: i64,
        page: &PageRequest,
    ) -> Result<Vec<TopicSummary>> {
        let topics = sqlx::query_as::<_, TopicSummary>(
            "SELECT t.id, t.subject, u.username AS starter,
                    MAX(COUNT(p.id) - 1, 0) AS replies,
                    t.views, t.created_at,
                    COALESCE(MAX(p.created_at), t.created_at) AS last_updated
             FROM topics t
             JOIN users u ON u.id = t.starter_id
             LEFT JOIN posts p ON p.topic_id = t.id
             WHERE t.board_id = ?
             GROUP BY t.id
             ORDER BY t.created_at DESC, t.id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(board_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;
        Ok(topics)
    }

    /// Add one to a topic's view counter.
    ///
    /// Returns false if the topic does not exist.
    pub async fn increment_views(&self, topic_id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE topics SET views = views + 1 WHERE id = ?")
            .bind(topic_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

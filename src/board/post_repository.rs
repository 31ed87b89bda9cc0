//! Post repository for Corkboard.

use super::pagination::PageRequest;
use super::post::{NewPost, Post, PostView};
use crate::db::DbPool;
use crate::{ForumError, Result};

const POST_COLUMNS: &str =
    "p.id, p.message, p.topic_id, p.created_by, p.created_at, p.updated_by, p.updated_at";

/// Repository for post operations.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post.
    ///
    /// Returns the created post with the assigned ID.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (message, topic_id, created_by) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_post.message)
        .bind(new_post.topic_id)
        .bind(new_post.created_by)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ForumError::NotFound("post".to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.id = ?");
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(post)
    }

    /// Get a post only if it sits in the given topic on the given board.
    pub async fn get_in_topic(
        &self,
        board_id: i64,
        topic_id: i64,
        post_id: i64,
    ) -> Result<Option<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p
             JOIN topics t ON t.id = p.topic_id
             WHERE p.id = ? AND p.topic_id = ? AND t.board_id = ?"
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .bind(topic_id)
            .bind(board_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(post)
    }

    /// Like [`get_in_topic`](Self::get_in_topic), additionally requiring
    /// that `user_id` authored the post.
    pub async fn get_owned(
        &self,
        board_id: i64,
        topic_id: i64,
        post_id: i64,
        user_id: i64,
    ) -> Result<Option<Post>> {
        Ok(self
            .get_in_topic(board_id, topic_id, post_id)
            .await?
            .filter(|post| post.created_by == user_id))
    }

    /// Count posts in a topic.
    pub async fn count_by_topic(&self, topic_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE topic_id = ?")
            .bind(topic_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// List one page of a topic's posts, oldest first.
    pub async fn list_by_topic(&self, topic_id: i64, page: &PageRequest) -> Result<Vec<PostView>> {
        let posts = sqlx::query_as::<_, PostView>(
            "SELECT p.id, p.message, p.created_by, a.username AS author, p.created_at,
                    e.username AS editor, p.updated_at
             FROM posts p
             JOIN users a ON a.id = p.created_by
             LEFT JOIN users e ON e.id = p.updated_by
             WHERE p.topic_id = ?
             ORDER BY p.created_at ASC, p.id ASC
             LIMIT ? OFFSET ?",
        )
        .bind(topic_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;
        Ok(posts)
    }

    /// List the most recent posts of a topic, newest first.
    pub async fn list_recent_by_topic(&self, topic_id: i64, limit: i64) -> Result<Vec<PostView>> {
        let posts = sqlx::query_as::<_, PostView>(
            "SELECT p.id, p.message, p.created_by, a.username AS author, p.created_at,
                    e.username AS editor, p.updated_at
             FROM posts p
             JOIN users a ON a.id = p.created_by
             LEFT JOIN users e ON e.id = p.updated_by
             WHERE p.topic_id = ?
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT ?",
        )
        .bind(topic_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(posts)
    }

    /// Replace a post's message, stamping the editor and edit time in the
    /// same statement.
    ///
    /// Returns false if the post does not exist.
    pub async fn update_message(&self, post_id: i64, editor_id: i64, message: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE posts SET message = ?, updated_by = ?, updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(message)
        .bind(editor_id)
        .bind(post_id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

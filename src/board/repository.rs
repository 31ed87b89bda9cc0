//! Board repository for Corkboard.
//!
//! Boards are created out-of-band (seed configuration or this repository);
//! the web interface only reads them.

use tracing::info;

use super::types::{
    Board, BoardSummary, LastPost, NewBoard, MAX_BOARD_DESCRIPTION_LENGTH, MAX_BOARD_NAME_LENGTH,
};
use crate::db::DbPool;
use crate::{ForumError, Result};

/// Repository for board operations.
pub struct BoardRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> BoardRepository<'a> {
    /// Create a new BoardRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new board in the database.
    ///
    /// Returns the created board with the assigned ID.
    pub async fn create(&self, new_board: &NewBoard) -> Result<Board> {
        validate_new_board(new_board)?;
        if self.name_exists(&new_board.name).await? {
            return Err(ForumError::Validation(format!(
                "board {:?} already exists",
                new_board.name
            )));
        }

        let id: i64 =
            sqlx::query_scalar("INSERT INTO boards (name, description) VALUES (?, ?) RETURNING id")
                .bind(&new_board.name)
                .bind(&new_board.description)
                .fetch_one(self.pool)
                .await
                .map_err(|e| ForumError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ForumError::NotFound("board".to_string()))
    }

    /// Get a board by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Board>> {
        let board = sqlx::query_as::<_, Board>(
            "SELECT id, name, description FROM boards WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(board)
    }

    /// Get a board by name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Board>> {
        let board = sqlx::query_as::<_, Board>(
            "SELECT id, name, description FROM boards WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;
        Ok(board)
    }

    /// Check whether a board name is taken.
    pub async fn name_exists(&self, name: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM boards WHERE name = ?)")
                .bind(name)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Create the board unless one with the same name already exists.
    ///
    /// Returns the board and whether it was created.
    pub async fn ensure_exists(&self, new_board: &NewBoard) -> Result<(Board, bool)> {
        if let Some(board) = self.get_by_name(&new_board.name).await? {
            return Ok((board, false));
        }
        let board = self.create(new_board).await?;
        info!(board_id = board.id, name = %board.name, "Created board");
        Ok((board, true))
    }

    /// List all boards ordered by ID.
    pub async fn list(&self) -> Result<Vec<Board>> {
        let boards =
            sqlx::query_as::<_, Board>("SELECT id, name, description FROM boards ORDER BY id")
                .fetch_all(self.pool)
                .await?;
        Ok(boards)
    }

    /// List all boards with topic and post counts and the most recent post.
    pub async fn list_with_stats(&self) -> Result<Vec<BoardSummary>> {
        let rows = sqlx::query_as::<_, BoardSummaryRow>(
            "SELECT b.id, b.name, b.description,
                    (SELECT COUNT(*) FROM topics t WHERE t.board_id = b.id) AS topics_count,
                    (SELECT COUNT(*) FROM posts p JOIN topics t ON t.id = p.topic_id
                      WHERE t.board_id = b.id) AS posts_count,
                    lp.topic_id AS last_topic_id,
                    lp.created_at AS last_created_at,
                    u.username AS last_author
             FROM boards b
             LEFT JOIN posts lp ON lp.id = (
                 SELECT p.id FROM posts p JOIN topics t ON t.id = p.topic_id
                 WHERE t.board_id = b.id
                 ORDER BY p.created_at DESC, p.id DESC
                 LIMIT 1)
             LEFT JOIN users u ON u.id = lp.created_by
             ORDER BY b.id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(BoardSummaryRow::into_summary).collect())
    }
}

fn validate_new_board(new_board: &NewBoard) -> Result<()> {
    let name_len = new_board.name.chars().count();
    if name_len == 0 {
        return Err(ForumError::Validation("board name is required".to_string()));
    }
    if name_len > MAX_BOARD_NAME_LENGTH {
        return Err(ForumError::Validation(format!(
            "board name must be at most {MAX_BOARD_NAME_LENGTH} characters"
        )));
    }
    if new_board.description.chars().count() > MAX_BOARD_DESCRIPTION_LENGTH {
        return Err(ForumError::Validation(format!(
            "board description must be at most {MAX_BOARD_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct BoardSummaryRow {
    id: i64,
    name: String,
    description: String,
    topics_count: i64,
    posts_count: i64,
    last_topic_id: Option<i64>,
    last_created_at: Option<String>,
    last_author: Option<String>,
}

impl BoardSummaryRow {
    fn into_summary(self) -> BoardSummary {
        let last_post = match (self.last_topic_id, self.last_created_at, self.last_author) {
            (Some(topic_id), Some(created_at), Some(author)) => Some(LastPost {
                topic_id,
                created_at,
                author,
            }),
            _ => None,
        };
        BoardSummary {
            id: self.id,
            name: self.name,
            description: self.description,
            topics_count: self.topics_count,
            posts_count: self.posts_count,
            last_post,
        }
    }
}

//! Forum service for Corkboard.
//!
//! This module ties the board, topic and post repositories together into
//! the operations the web layer performs. Every lookup that takes a parent
//! identifier checks the parent chain, so a topic requested under the wrong
//! board is indistinguishable from a missing one.

use tracing::{debug, info};

use super::pagination::{Page, PageRequest, PageSelector, POSTS_PER_PAGE, TOPICS_PER_PAGE};
use super::post::{NewPost, Post, PostView, MAX_MESSAGE_LENGTH};
use super::post_repository::PostRepository;
use super::repository::BoardRepository;
use super::topic::{Topic, TopicSummary, MAX_SUBJECT_LENGTH};
use super::topic_repository::TopicRepository;
use super::types::{Board, BoardSummary};
use crate::db::Database;
use crate::{ForumError, Result};

/// Number of recent posts shown beneath the reply form.
pub const RECENT_POSTS_ON_REPLY: i64 = 10;

fn validate_subject(subject: &str) -> Result<()> {
    if subject.trim().is_empty() {
        return Err(ForumError::Validation("subject is required".to_string()));
    }
    if subject.chars().count() > MAX_SUBJECT_LENGTH {
        return Err(ForumError::Validation(format!(
            "subject must be at most {MAX_SUBJECT_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_message(message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(ForumError::Validation("message is required".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(ForumError::Validation(format!(
            "message must be at most {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// A board with one page of its topics.
#[derive(Debug, Clone)]
pub struct BoardTopics {
    /// The board.
    pub board: Board,
    /// The requested page of topics.
    pub topics: Page<TopicSummary>,
}

/// A topic with one page of its posts.
#[derive(Debug, Clone)]
pub struct TopicPosts {
    /// The board the topic belongs to.
    pub board: Board,
    /// The topic, with the view counter already incremented for this view.
    pub topic: Topic,
    /// The requested page of posts.
    pub posts: Page<PostView>,
}

/// A post the acting user may edit, with its parents.
#[derive(Debug, Clone)]
pub struct EditablePost {
    /// Parent board.
    pub board: Board,
    /// Parent topic.
    pub topic: Topic,
    /// The post.
    pub post: Post,
}

/// Service for forum operations.
pub struct ForumService<'a> {
    db: &'a Database,
}

impl<'a> ForumService<'a> {
    /// Create a new ForumService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List every board with its counters and most recent post.
    pub async fn board_index(&self) -> Result<Vec<BoardSummary>> {
        BoardRepository::new(self.db.pool()).list_with_stats().await
    }

    /// Get a board by ID.
    pub async fn board(&self, board_id: i64) -> Result<Board> {
        BoardRepository::new(self.db.pool())
            .get_by_id(board_id)
            .await?
            .ok_or_else(|| ForumError::NotFound("board".to_string()))
    }

    /// Get a topic that belongs to the given board, along with the board.
    pub async fn topic(&self, board_id: i64, topic_id: i64) -> Result<(Board, Topic)> {
        let board = self.board(board_id).await?;
        let topic = TopicRepository::new(self.db.pool())
            .get_in_board(board_id, topic_id)
            .await?
            .ok_or_else(|| ForumError::NotFound("topic".to_string()))?;
        Ok((board, topic))
    }

    /// One page of a board's topics, newest first.
    pub async fn board_topics(&self, board_id: i64, page: PageSelector) -> Result<BoardTopics> {
        let board = self.board(board_id).await?;
        let repo = TopicRepository::new(self.db.pool());

        let total = repo.count_by_board(board_id).await?;
        let request = PageRequest::resolve(page, total, TOPICS_PER_PAGE)?;
        let items = repo.list_by_board(board_id, &request).await?;

        Ok(BoardTopics {
            board,
            topics: Page::new(items, request, total),
        })
    }

    /// One page of a topic's posts, oldest first.
    ///
    /// Counts as a view: the topic's view counter goes up by one once the
    /// page has been fetched.
    pub async fn topic_posts(
        &self,
        board_id: i64,
        topic_id: i64,
        page: PageSelector,
    ) -> Result<TopicPosts> {
        let (board, mut topic) = self.topic(board_id, topic_id).await?;
        let repo = PostRepository::new(self.db.pool());

        let total = repo.count_by_topic(topic_id).await?;
        let request = PageRequest::resolve(page, total, POSTS_PER_PAGE)?;
        let items = repo.list_by_topic(topic_id, &request).await?;

        if TopicRepository::new(self.db.pool())
            .increment_views(topic_id)
            .await?
        {
            topic.views += 1;
        }

        Ok(TopicPosts {
            board,
            topic,
            posts: Page::new(items, request, total),
        })
    }

    /// Start a topic with its opening post.
    ///
    /// The topic and the post are written in one transaction.
    pub async fn start_topic(
        &self,
        board_id: i64,
        starter_id: i64,
        subject: &str,
        message: &str,
    ) -> Result<Topic> {
        validate_subject(subject)?;
        validate_message(message)?;
        self.board(board_id).await?;

        let mut tx = self.db.begin().await?;

        let topic_id: i64 = sqlx::query_scalar(
            "INSERT INTO topics (subject, board_id, starter_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(subject)
        .bind(board_id)
        .bind(starter_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        sqlx::query("INSERT INTO posts (message, topic_id, created_by) VALUES (?, ?, ?)")
            .bind(message)
            .bind(topic_id)
            .bind(starter_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| ForumError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| ForumError::Database(e.to_string()))?;

        info!(board_id, topic_id, user_id = starter_id, "Topic started");

        TopicRepository::new(self.db.pool())
            .get_by_id(topic_id)
            .await?
            .ok_or_else(|| ForumError::NotFound("topic".to_string()))
    }

    /// Reply to a topic.
    pub async fn reply(
        &self,
        board_id: i64,
        topic_id: i64,
        author_id: i64,
        message: &str,
    ) -> Result<Post> {
        validate_message(message)?;
        self.topic(board_id, topic_id).await?;

        let post = PostRepository::new(self.db.pool())
            .create(&NewPost::new(topic_id, author_id, message))
            .await?;
        info!(topic_id, post_id = post.id, user_id = author_id, "Reply posted");
        Ok(post)
    }

    /// The newest posts of a topic, for context under the reply form.
    pub async fn recent_posts(&self, topic_id: i64) -> Result<Vec<PostView>> {
        PostRepository::new(self.db.pool())
            .list_recent_by_topic(topic_id, RECENT_POSTS_ON_REPLY)
            .await
    }

    /// Get a post for editing.
    ///
    /// Fails with `NotFound` unless the post exists under the given topic
    /// and board and was written by `user_id`.
    pub async fn editable_post(
        &self,
        board_id: i64,
        topic_id: i64,
        post_id: i64,
        user_id: i64,
    ) -> Result<EditablePost> {
        let (board, topic) = self.topic(board_id, topic_id).await?;
        let post = PostRepository::new(self.db.pool())
            .get_owned(board_id, topic_id, post_id, user_id)
            .await?
            .ok_or_else(|| {
                debug!(post_id, user_id, "Post missing or not owned by user");
                ForumError::NotFound("post".to_string())
            })?;
        Ok(EditablePost { board, topic, post })
    }

    /// Replace the message of a post owned by `user_id`.
    pub async fn edit_post(
        &self,
        board_id: i64,
        topic_id: i64,
        post_id: i64,
        user_id: i64,
        message: &str,
    ) -> Result<Post> {
        validate_message(message)?;
        self.editable_post(board_id, topic_id, post_id, user_id)
            .await?;

        let repo = PostRepository::new(self.db.pool());
        if !repo.update_message(post_id, user_id, message).await? {
            return Err(ForumError::NotFound("post".to_string()));
        }
        info!(post_id, user_id, "Post edited");

        repo.get_by_id(post_id)
            .await?
            .ok_or_else(|| ForumError::NotFound("post".to_string()))
    }
}

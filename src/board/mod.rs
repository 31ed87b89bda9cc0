//! Board module for Corkboard.
//!
//! This module provides the forum's content model:
//! - Boards, listed on the index page with activity counters
//! - Topics, paginated per board
//! - Posts, paginated per topic and editable by their author

mod pagination;
mod post;
mod post_repository;
mod repository;
mod service;
mod topic;
mod topic_repository;
mod types;

pub use pagination::{Page, PageRequest, PageSelector, POSTS_PER_PAGE, TOPICS_PER_PAGE};
pub use post::{NewPost, Post, PostView, MAX_MESSAGE_LENGTH};
pub use post_repository::PostRepository;
pub use repository::BoardRepository;
pub use service::{
    BoardTopics, EditablePost, ForumService, TopicPosts, RECENT_POSTS_ON_REPLY,
};
#[cfg(test)]
pub(crate) use topic::NewTopic;
pub use topic::{Topic, TopicSummary, MAX_SUBJECT_LENGTH};
pub use topic_repository::TopicRepository;
pub use types::{
    Board, BoardSummary, LastPost, NewBoard, MAX_BOARD_DESCRIPTION_LENGTH, MAX_BOARD_NAME_LENGTH,
};

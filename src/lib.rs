//! Corkboard - a small discussion forum.
//!
//! Boards hold topics, topics hold paginated posts, and registered users
//! start topics, reply and edit their own posts through server-rendered
//! HTML pages.

pub mod auth;
pub mod board;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{
    hash_password, register, verify_password, PasswordError, RegistrationError,
    RegistrationRequest, SessionError, SessionManager, ValidationError,
};
pub use board::{Board, BoardRepository, ForumService, NewBoard, Page, Post, Topic};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{ForumError, Result};
pub use web::WebServer;

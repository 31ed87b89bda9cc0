//! Authentication module for Corkboard.
//!
//! This module provides password hashing, login sessions, account
//! registration and credential validation.

mod password;
mod registration;
mod session;
pub mod validation;

pub use password::{hash_password, verify_password, PasswordError};
pub use registration::{register, RegistrationError, RegistrationRequest};
pub use session::{generate_token, hash_token, SessionError, SessionManager};
pub use validation::ValidationError;

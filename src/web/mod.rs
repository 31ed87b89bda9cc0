//! Web interface for Corkboard.
//!
//! Server-rendered HTML pages over the board, topic and post model, with
//! cookie sessions for signup, login and logout.

pub mod error;
pub mod extract;
pub mod forms;
pub mod markdown;
pub mod handlers;
pub mod middleware;
pub mod redirect;
pub mod router;
pub mod server;
pub mod templates;

pub use error::{WebError, WebResult};
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
pub use templates::TemplateEngine;

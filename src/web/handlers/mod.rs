//! Page handlers for the Corkboard web interface.

pub mod account;
pub mod board;

pub use account::*;
pub use board::*;

use axum::response::Html;
use serde::Serialize;

use crate::auth::SessionManager;
use crate::board::ForumService;
use crate::web::error::WebResult;
use crate::web::templates::TemplateEngine;
use crate::{Config, Database, Result};

/// Application state shared by all handlers.
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Compiled page templates.
    pub templates: TemplateEngine,
    /// Loaded configuration.
    pub config: Config,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, config: Config) -> Result<Self> {
        let templates = TemplateEngine::new(&config.forum)?;
        Ok(Self {
            db,
            templates,
            config,
        })
    }

    /// Forum operations over this state's database.
    pub fn forum(&self) -> ForumService<'_> {
        ForumService::new(&self.db)
    }

    /// Session operations using the configured lifetime.
    pub fn sessions(&self) -> SessionManager<'_> {
        SessionManager::new(self.db.pool(), self.config.session.ttl_secs)
    }

    /// Render a page.
    pub fn render<S: Serialize>(&self, template: &str, context: S) -> WebResult<Html<String>> {
        Ok(Html(self.templates.render(template, context)?))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

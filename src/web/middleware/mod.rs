//! Middleware for the Corkboard web interface.

pub mod csrf;
pub mod security;
pub mod session;

pub use csrf::{csrf_cookie_layer, CsrfForm, CsrfProtected, CsrfToken};
pub use security::security_headers;
pub use session::{load_session, CurrentUser, RequireUser};

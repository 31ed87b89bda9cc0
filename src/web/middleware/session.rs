//! Cookie session middleware and user extractors.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::auth::SessionManager;
use crate::db::User;
use crate::web::handlers::AppState;
use crate::web::redirect::Found;

/// Middleware resolving the session cookie to a user.
///
/// The result is stored in the request extensions as [`CurrentUser`]. An
/// unknown, expired or revoked token simply yields an anonymous request.
pub async fn load_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let user = match jar.get(&state.config.session.cookie_name) {
        Some(cookie) => {
            let sessions = SessionManager::new(state.db.pool(), state.config.session.ttl_secs);
            match sessions.resolve(cookie.value()).await {
                Ok(user) => user,
                Err(e) => {
                    warn!(error = %e, "Session lookup failed");
                    None
                }
            }
        }
        None => None,
    };

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

/// The logged-in user, if any.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .unwrap_or_default())
    }
}

/// The logged-in user. Anonymous requests are sent to the login page with
/// the requested path and query in `next`.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = Found;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(CurrentUser(Some(user))) = parts.extensions.get::<CurrentUser>() {
            return Ok(RequireUser(user.clone()));
        }

        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or(&parts.uri);
        let next = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        Err(Found::to_login(next))
    }
}

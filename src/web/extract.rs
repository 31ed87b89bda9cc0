//! Request extractors that turn malformed input into 404s.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::board::PageSelector;
use crate::web::error::WebError;

/// Path parameters, where anything that fails to parse is a missing page.
///
/// `/boards/abc/` is not a board, so it gets a 404 rather than a 400.
#[derive(Debug, Clone, Copy)]
pub struct IdPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                debug!(error = %e, path = %parts.uri.path(), "Unusable path parameters");
                WebError::NotFound
            })?;
        Ok(IdPath(value))
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    page: Option<String>,
}

/// The `page` query parameter.
///
/// Absent means page 1; `last` means the last page; anything that is not a
/// number is a 404.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageParam(pub PageSelector);

#[async_trait]
impl<S> FromRequestParts<S> for PageParam
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| WebError::NotFound)?;
        let selector = PageSelector::from_query(query.page.as_deref())?;
        Ok(PageParam(selector))
    }
}

//! Signup, login and logout pages.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use minijinja::context;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::validation::ValidationError;
use crate::auth::{register, RegistrationError, RegistrationRequest, SessionError};
use crate::db::UserRepository;
use crate::web::error::{WebError, WebResult};
use crate::web::forms::{FormErrors, LoginForm, SignupForm};
use crate::web::handlers::AppState;
use crate::web::middleware::csrf::rotated_csrf_cookie;
use crate::web::middleware::{CsrfForm, CsrfToken, CurrentUser};
use crate::web::redirect::Found;

const INVALID_LOGIN: &str = "Please enter a correct username and password. Note that both fields may be case-sensitive.";
const INACTIVE_LOGIN: &str = "This account is inactive.";

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((state.config.session.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.session.secure_cookie)
        .build()
}

/// GET /account/signup/ - Signup form.
pub async fn signup_form(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    csrf: CsrfToken,
) -> WebResult<Html<String>> {
    state.render(
        "signup.html",
        context! {
            user => user,
            form => SignupForm::default(),
            errors => FormErrors::new(),
            csrf_token => csrf.issue(),
        },
    )
}

/// POST /account/signup/ - Create an account and log it in.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    csrf: CsrfToken,
    CsrfForm(mut form): CsrfForm<SignupForm>,
) -> WebResult<Response> {
    let mut errors = match form.clean() {
        Ok(()) => FormErrors::new(),
        Err(errors) => errors,
    };

    if errors.is_empty() {
        let users = UserRepository::new(state.db.pool());
        let request = RegistrationRequest::new(&form.username, &form.email, &form.password1);
        match register(&users, request).await {
            Ok(new_user) => {
                let token = state.sessions().start(new_user.id).await?;
                info!(user_id = new_user.id, username = %new_user.username, "Signed up");
                let jar = jar
                    .add(session_cookie(&state, token))
                    .add(rotated_csrf_cookie(state.config.session.secure_cookie));
                return Ok((jar, Found::to("/")).into_response());
            }
            Err(RegistrationError::UsernameExists) => {
                errors.add("username", ValidationError::UsernameTaken.to_string());
            }
            Err(RegistrationError::Validation { field, error }) => {
                errors.add(field, error.to_string());
            }
            Err(e) => return Err(WebError::Internal(e.to_string())),
        }
    }

    let page = state.render(
        "signup.html",
        context! { user => user, form => form, errors => errors, csrf_token => csrf.issue() },
    )?;
    Ok(page.into_response())
}

/// Query string of the login page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    /// Where to go after logging in.
    pub next: String,
}

/// GET /account/login/ - Login form.
pub async fn login_form(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    csrf: CsrfToken,
    Query(query): Query<LoginQuery>,
) -> WebResult<Html<String>> {
    let form = LoginForm {
        next: query.next,
        ..LoginForm::default()
    };
    state.render(
        "login.html",
        context! {
            user => user,
            form => form,
            errors => FormErrors::new(),
            csrf_token => csrf.issue(),
        },
    )
}

/// POST /account/login/ - Check credentials and start a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    csrf: CsrfToken,
    CsrfForm(mut form): CsrfForm<LoginForm>,
) -> WebResult<Response> {
    let errors = match form.clean() {
        Ok(()) => match state.sessions().login(&form.username, &form.password).await {
            Ok((logged_in, token)) => {
                let target = form.safe_next().unwrap_or("/").to_string();
                let jar = jar
                    .add(session_cookie(&state, token))
                    .add(rotated_csrf_cookie(state.config.session.secure_cookie));
                info!(user_id = logged_in.id, next = %target, "Login redirect");
                return Ok((jar, Found::to(target)).into_response());
            }
            Err(SessionError::InvalidCredentials) => {
                let mut errors = FormErrors::new();
                errors.add_non_field(INVALID_LOGIN);
                errors
            }
            Err(SessionError::AccountInactive) => {
                warn!(username = %form.username, "Login attempt on inactive account");
                let mut errors = FormErrors::new();
                errors.add_non_field(INACTIVE_LOGIN);
                errors
            }
            Err(SessionError::Storage(e)) => return Err(e.into()),
        },
        Err(errors) => errors,
    };

    let page = state.render(
        "login.html",
        context! { user => user, form => form, errors => errors, csrf_token => csrf.issue() },
    )?;
    Ok(page.into_response())
}

/// GET|POST /account/logout/ - End the session.
///
/// Not CSRF checked; the nav bar logs out with a plain GET link.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> WebResult<Response> {
    let cookie_name = state.config.session.cookie_name.clone();
    if let Some(cookie) = jar.get(&cookie_name) {
        state.sessions().logout(cookie.value()).await?;
    }
    let jar = jar.remove(Cookie::build((cookie_name, "")).path("/"));
    Ok((jar, Found::to("/")).into_response())
}

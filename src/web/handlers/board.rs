//! Board, topic and post pages.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use minijinja::context;

use crate::web::error::WebResult;
use crate::web::extract::{IdPath, PageParam};
use crate::web::forms::{FormErrors, NewTopicForm, PostForm};
use crate::web::handlers::AppState;
use crate::web::middleware::{CsrfForm, CsrfToken, CurrentUser, RequireUser};
use crate::web::redirect::Found;

fn topic_posts_url(board_id: i64, topic_id: i64) -> String {
    format!("/boards/{board_id}/topics/{topic_id}/")
}

/// GET / - List all boards.
pub async fn index(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> WebResult<Html<String>> {
    let boards = state.forum().board_index().await?;
    state.render("index.html", context! { user => user, boards => boards })
}

/// GET /boards/:board_id/ - One page of a board's topics.
pub async fn board_topics(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    IdPath(board_id): IdPath<i64>,
    PageParam(page): PageParam,
) -> WebResult<Html<String>> {
    let listing = state.forum().board_topics(board_id, page).await?;
    state.render(
        "topics.html",
        context! { user => user, board => listing.board, topics => listing.topics },
    )
}

/// GET /boards/:board_id/new_topic - New topic form.
pub async fn new_topic_form(
    State(state): State<Arc<AppState>>,
    IdPath(board_id): IdPath<i64>,
    RequireUser(user): RequireUser,
    csrf: CsrfToken,
) -> WebResult<Html<String>> {
    let board = state.forum().board(board_id).await?;
    state.render(
        "new_topic.html",
        context! {
            user => user,
            board => board,
            form => NewTopicForm::default(),
            errors => FormErrors::new(),
            csrf_token => csrf.issue(),
        },
    )
}

/// POST /boards/:board_id/new_topic - Start a topic with its first post.
pub async fn new_topic(
    State(state): State<Arc<AppState>>,
    IdPath(board_id): IdPath<i64>,
    RequireUser(user): RequireUser,
    csrf: CsrfToken,
    CsrfForm(mut form): CsrfForm<NewTopicForm>,
) -> WebResult<Response> {
    let forum = state.forum();
    let board = forum.board(board_id).await?;

    if let Err(errors) = form.clean() {
        let page = state.render(
            "new_topic.html",
            context! {
                user => user,
                board => board,
                form => form,
                errors => errors,
                csrf_token => csrf.issue(),
            },
        )?;
        return Ok(page.into_response());
    }

    let topic = forum
        .start_topic(board_id, user.id, &form.subject, &form.message)
        .await?;
    Ok(Found::to(topic_posts_url(board_id, topic.id)).into_response())
}

/// GET /boards/:board_id/topics/:topic_id/ - One page of a topic's posts.
///
/// Every successful render counts as a view.
pub async fn topic_posts(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    IdPath((board_id, topic_id)): IdPath<(i64, i64)>,
    PageParam(page): PageParam,
) -> WebResult<Html<String>> {
    let listing = state.forum().topic_posts(board_id, topic_id, page).await?;
    state.render(
        "topic_posts.html",
        context! {
            user => user,
            board => listing.board,
            topic => listing.topic,
            posts => listing.posts,
        },
    )
}

/// GET /boards/:board_id/topics/:topic_id/reply/ - Reply form.
pub async fn reply_form(
    State(state): State<Arc<AppState>>,
    IdPath((board_id, topic_id)): IdPath<(i64, i64)>,
    RequireUser(user): RequireUser,
    csrf: CsrfToken,
) -> WebResult<Html<String>> {
    let forum = state.forum();
    let (board, topic) = forum.topic(board_id, topic_id).await?;
    let recent = forum.recent_posts(topic_id).await?;
    state.render(
        "reply_topic.html",
        context! {
            user => user,
            board => board,
            topic => topic,
            posts => recent,
            form => PostForm::default(),
            errors => FormErrors::new(),
            csrf_token => csrf.issue(),
        },
    )
}

/// POST /boards/:board_id/topics/:topic_id/reply/ - Post a reply.
pub async fn reply(
    State(state): State<Arc<AppState>>,
    IdPath((board_id, topic_id)): IdPath<(i64, i64)>,
    RequireUser(user): RequireUser,
    csrf: CsrfToken,
    CsrfForm(mut form): CsrfForm<PostForm>,
) -> WebResult<Response> {
    let forum = state.forum();
    let (board, topic) = forum.topic(board_id, topic_id).await?;

    if let Err(errors) = form.clean() {
        let recent = forum.recent_posts(topic_id).await?;
        let page = state.render(
            "reply_topic.html",
            context! {
                user => user,
                board => board,
                topic => topic,
                posts => recent,
                form => form,
                errors => errors,
                csrf_token => csrf.issue(),
            },
        )?;
        return Ok(page.into_response());
    }

    forum
        .reply(board_id, topic_id, user.id, &form.message)
        .await?;
    Ok(Found::to(topic_posts_url(board_id, topic_id)).into_response())
}

/// GET /boards/:board_id/topics/:topic_id/posts/:post_id/edit/ - Edit form.
///
/// Only the author may edit; anyone else gets the same 404 as for a
/// missing post.
pub async fn edit_post_form(
    State(state): State<Arc<AppState>>,
    IdPath((board_id, topic_id, post_id)): IdPath<(i64, i64, i64)>,
    RequireUser(user): RequireUser,
    csrf: CsrfToken,
) -> WebResult<Html<String>> {
    let editable = state
        .forum()
        .editable_post(board_id, topic_id, post_id, user.id)
        .await?;
    let form = PostForm {
        message: editable.post.message.clone(),
        ..PostForm::default()
    };
    state.render(
        "edit_post.html",
        context! {
            user => user,
            board => editable.board,
            topic => editable.topic,
            post => editable.post,
            form => form,
            errors => FormErrors::new(),
            csrf_token => csrf.issue(),
        },
    )
}

/// POST /boards/:board_id/topics/:topic_id/posts/:post_id/edit/ - Save an edit.
pub async fn edit_post(
    State(state): State<Arc<AppState>>,
    IdPath((board_id, topic_id, post_id)): IdPath<(i64, i64, i64)>,
    RequireUser(user): RequireUser,
    csrf: CsrfToken,
    CsrfForm(mut form): CsrfForm<PostForm>,
) -> WebResult<Response> {
    let forum = state.forum();
    let editable = forum
        .editable_post(board_id, topic_id, post_id, user.id)
        .await?;

    if let Err(errors) = form.clean() {
        let page = state.render(
            "edit_post.html",
            context! {
                user => user,
                board => editable.board,
                topic => editable.topic,
                post => editable.post,
                form => form,
                errors => errors,
                csrf_token => csrf.issue(),
            },
        )?;
        return Ok(page.into_response());
    }

    forum
        .edit_post(board_id, topic_id, post_id, user.id, &form.message)
        .await?;
    Ok(Found::to(topic_posts_url(board_id, topic_id)).into_response())
}

//! Comment submission endpoint.

use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use gazette_common::{AppError, AppResult};
use gazette_core::CreateCommentInput;
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState};

/// Submitted comment form.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

/// Create a comment on a post.
///
/// Valid or not, the client lands back on the detail page: an invalid
/// submission simply adds no comment. A missing post is still a 404.
async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let result = state
        .comment_service
        .create(&user.id, &id, CreateCommentInput { text: form.text })
        .await;

    match result {
        Ok(_) | Err(AppError::Validation(_)) => {
            Ok(Redirect::to(&format!("/posts/{id}")).into_response())
        }
        Err(err) => Err(err),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/posts/{id}/comment", post(add_comment))
}

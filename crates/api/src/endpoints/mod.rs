//! API endpoints.

mod auth;
mod comments;
mod follows;
mod groups;
mod posts;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::middleware::AppState;

/// Create the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(posts::router())
        .merge(comments::router())
        .merge(follows::router())
        .merge(groups::router())
        .nest("/auth", auth::router())
}

/// Custom not-found page for unknown paths.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {
                "code": "NOT_FOUND",
                "message": "Page not found",
            }
        })),
    )
        .into_response()
}

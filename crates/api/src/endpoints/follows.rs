//! Follow feed and follow/unfollow endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Redirect,
    routing::{get, post},
};
use gazette_common::{AppResult, Paginated};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::PostView,
};

use super::posts::{PageQuery, render_page};

/// Paginated feed of posts by authors the viewer follows.
async fn follow_index(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<PostView>>> {
    let author_ids = state.follow_service.followed_author_ids(&user.id).await?;
    let page = state
        .post_service
        .list_feed_page(&author_ids, query.page.as_deref())
        .await?;

    Ok(Json(render_page(&state, page).await?))
}

/// Follow an author, then land on their profile.
///
/// Idempotent, and a self-follow attempt silently creates nothing; the
/// redirect happens regardless.
async fn profile_follow(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(username): Path<String>,
) -> AppResult<Redirect> {
    let author = state.user_service.get_by_username(&username).await?;
    state.follow_service.follow(&user.id, &author.id).await?;

    Ok(Redirect::to(&format!("/profile/{username}")))
}

/// Unfollow an author, then land on their profile.
///
/// Removing a non-existent edge is not an error.
async fn profile_unfollow(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(username): Path<String>,
) -> AppResult<Redirect> {
    let author = state.user_service.get_by_username(&username).await?;
    state.follow_service.unfollow(&user.id, &author.id).await?;

    Ok(Redirect::to(&format!("/profile/{username}")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/follow", get(follow_index))
        .route("/profile/{username}/follow", post(profile_follow))
        .route("/profile/{username}/unfollow", post(profile_unfollow))
}

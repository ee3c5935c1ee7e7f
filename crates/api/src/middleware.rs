//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use gazette_common::{PageCache, StorageBackend};
use gazette_core::{CommentService, FollowService, GroupService, PostService, UserService};

/// Name of the session cookie carrying the access token.
pub const TOKEN_COOKIE: &str = "token";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub group_service: GroupService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub follow_service: FollowService,
    pub storage: Arc<dyn StorageBackend>,
    pub page_cache: PageCache,
    pub cache_enabled: bool,
}

/// Authentication middleware.
///
/// Resolves a bearer token or the session cookie to a user and stashes the
/// model in request extensions for the extractors.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = bearer_token(&req).or_else(|| cookie_token(&req));

    if let Some(token) = token
        && let Ok(user) = state.user_service.authenticate_by_token(&token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}

fn bearer_token(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(ToString::to_string)
}

fn cookie_token(req: &Request<Body>) -> Option<String> {
    let jar = CookieJar::from_headers(req.headers());
    jar.get(TOKEN_COOKIE).map(|c| c.value().to_string())
}

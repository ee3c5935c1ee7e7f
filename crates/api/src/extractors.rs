//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, Uri, request::Parts},
    response::Redirect,
};
use gazette_db::entities::user;

/// Build the redirect to the login flow carrying the original target.
#[must_use]
pub fn login_redirect(uri: &Uri) -> Redirect {
    let next = uri.path_and_query().map_or("/", |pq| pq.as_str());
    Redirect::to(&format!("/auth/login?next={}", urlencoding::encode(next)))
}

/// Authenticated user extractor.
///
/// Rejection is a redirect to `/auth/login?next=<original target>`, not a
/// bare 401: protected pages send anonymous visitors through the login flow
/// and back.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get user from request extensions (set by auth middleware)
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| login_redirect(&parts.uri))
    }
}

/// Optional authenticated user extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}

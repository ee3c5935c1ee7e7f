//! Authentication endpoints.

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use gazette_common::AppResult;
use gazette_core::CreateUserInput;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    extractors::AuthUser,
    middleware::{AppState, TOKEN_COOKIE},
};

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .build()
}

/// Resolve the post-login target, accepting only local paths.
fn next_target(next: Option<String>) -> String {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//"))
        .unwrap_or_else(|| "/".to_string())
}

/// Signup form.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub name: Option<String>,
}

/// Create an account and sign the new user in.
async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> AppResult<(CookieJar, Redirect)> {
    form.validate()?;

    let user = state
        .user_service
        .create(CreateUserInput {
            username: form.username,
            password: form.password,
            name: form.name,
        })
        .await?;

    let token = match user.token {
        Some(token) => token,
        None => state.user_service.regenerate_token(&user.id).await?,
    };

    Ok((jar.add(session_cookie(token)), Redirect::to("/")))
}

/// Login flow query.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Where to return after a successful login.
    pub next: Option<String>,
}

/// Login form context.
#[derive(Debug, Serialize)]
pub struct LoginFormResponse {
    pub next: Option<String>,
}

/// Login form, echoing the return target.
async fn login_form(Query(query): Query<LoginQuery>) -> Json<LoginFormResponse> {
    Json(LoginFormResponse { next: query.next })
}

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Sign in and return to the `next` target (or the index).
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
    Form(form): Form<LoginForm>,
) -> AppResult<(CookieJar, Redirect)> {
    let user = state
        .user_service
        .authenticate(&form.username, &form.password)
        .await?;

    let token = match user.token {
        Some(token) => token,
        None => state.user_service.regenerate_token(&user.id).await?,
    };

    let target = next_target(query.next);
    Ok((jar.add(session_cookie(token)), Redirect::to(&target)))
}

/// Sign out: rotate the token so outstanding sessions die, drop the cookie.
async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    state.user_service.regenerate_token(&user.id).await?;

    // The removal cookie must carry the same path the session cookie was
    // set with.
    let removal = Cookie::build((TOKEN_COOKIE, "")).path("/").build();
    Ok((jar.remove(removal), Redirect::to("/")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", get(login_form).post(login))
        .route("/logout", post(logout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_target_accepts_local_paths_only() {
        assert_eq!(next_target(Some("/create".to_string())), "/create");
        assert_eq!(next_target(Some("https://evil.example".to_string())), "/");
        assert_eq!(next_target(Some("//evil.example".to_string())), "/");
        assert_eq!(next_target(None), "/");
    }
}

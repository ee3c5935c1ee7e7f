//! Group creation endpoint.

use axum::{Form, Json, Router, extract::State, routing::post};
use gazette_common::AppResult;
use gazette_core::CreateGroupInput;
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::GroupView};

/// Group creation form.
#[derive(Debug, Deserialize)]
pub struct CreateGroupForm {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// Create a group.
async fn create_group(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Form(form): Form<CreateGroupForm>,
) -> AppResult<Json<GroupView>> {
    let group = state
        .group_service
        .create(CreateGroupInput {
            title: form.title,
            slug: form.slug,
            description: form.description,
        })
        .await?;

    Ok(Json((&group).into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/groups", post(create_group))
}

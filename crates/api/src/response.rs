//! Page-context response types.
//!
//! Template rendering is out of scope; handlers return the context a
//! template layer would consume, serialized as JSON.

use std::collections::{BTreeMap, HashMap};

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use gazette_common::{AppError, StorageBackend};
use gazette_db::entities::{comment, group, post, user};
use serde::Serialize;

/// Public view of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
}

impl From<&user::Model> for UserView {
    fn from(u: &user::Model) -> Self {
        Self {
            id: u.id.clone(),
            username: u.username.clone(),
            name: u.name.clone(),
        }
    }
}

/// Public view of a group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<&group::Model> for GroupView {
    fn from(g: &group::Model) -> Self {
        Self {
            id: g.id.clone(),
            title: g.title.clone(),
            slug: g.slug.clone(),
            description: g.description.clone(),
        }
    }
}

/// Public view of a post.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: String,
    pub text: String,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub author: UserView,
    pub group: Option<GroupView>,
}

impl PostView {
    /// Assemble a post view from its model and pre-fetched relations.
    #[must_use]
    pub fn build(
        post: &post::Model,
        author: &user::Model,
        group: Option<&group::Model>,
        storage: &dyn StorageBackend,
    ) -> Self {
        Self {
            id: post.id.clone(),
            text: post.text.clone(),
            image_url: post.image_key.as_deref().map(|key| storage.public_url(key)),
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.map(|t| t.to_rfc3339()),
            author: author.into(),
            group: group.map(Into::into),
        }
    }
}

/// Public view of a comment.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub author: UserView,
}

impl CommentView {
    /// Assemble a comment view from its model and pre-fetched author.
    #[must_use]
    pub fn build(comment: &comment::Model, author: &user::Model) -> Self {
        Self {
            id: comment.id.clone(),
            text: comment.text.clone(),
            created_at: comment.created_at.to_rfc3339(),
            author: author.into(),
        }
    }
}

/// Turn a page of post models into views, joining pre-fetched relations.
///
/// Posts whose author went missing between queries are dropped rather than
/// rendered half-empty.
#[must_use]
pub fn post_views(
    posts: &[post::Model],
    users: &HashMap<String, user::Model>,
    groups: &HashMap<String, group::Model>,
    storage: &dyn StorageBackend,
) -> Vec<PostView> {
    posts
        .iter()
        .filter_map(|post| {
            let Some(author) = users.get(&post.author_id) else {
                tracing::warn!(post_id = %post.id, author_id = %post.author_id, "Post author missing");
                return None;
            };
            let group = post.group_id.as_deref().and_then(|id| groups.get(id));
            Some(PostView::build(post, author, group, storage))
        })
        .collect()
}

/// Submitted post-form values, echoed back on re-render.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostFormValues {
    pub text: String,
    pub group: Option<String>,
}

/// Post form context: current values, per-field errors, edit flag.
#[derive(Debug, Clone, Serialize)]
pub struct PostFormView {
    pub form: PostFormValues,
    pub errors: BTreeMap<String, Vec<String>>,
    pub is_edit: bool,
}

impl PostFormView {
    /// An empty create form.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            form: PostFormValues::default(),
            errors: BTreeMap::new(),
            is_edit: false,
        }
    }

    /// A pre-filled form without errors.
    #[must_use]
    pub fn filled(values: PostFormValues, is_edit: bool) -> Self {
        Self {
            form: values,
            errors: BTreeMap::new(),
            is_edit,
        }
    }

    /// A form re-rendered with a single field error.
    #[must_use]
    pub fn with_error(values: PostFormValues, field: &str, message: &str, is_edit: bool) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), vec![message.to_string()]);
        Self {
            form: values,
            errors,
            is_edit,
        }
    }
}

/// Map a service error from a form submission to a `(field, message)` pair,
/// if it is a form-level failure.
#[must_use]
pub fn form_field_error(err: &AppError) -> Option<(String, String)> {
    match err {
        AppError::Validation(msg) => {
            // Validation messages are "field: message".
            let (field, message) = msg.split_once(':').unwrap_or(("text", msg));
            Some((field.trim().to_string(), message.trim().to_string()))
        }
        AppError::GroupNotFound(_) => Some((
            "group".to_string(),
            "select a valid choice".to_string(),
        )),
        _ => None,
    }
}

/// Build a JSON response from an already-serialized payload.
#[must_use]
pub fn json_body(payload: String) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_field_error_mapping() {
        let err = AppError::Validation("text: this field is required".to_string());
        let (field, message) = form_field_error(&err).unwrap_or_default();
        assert_eq!(field, "text");
        assert_eq!(message, "this field is required");

        let err = AppError::GroupNotFound("g9".to_string());
        let (field, _) = form_field_error(&err).unwrap_or_default();
        assert_eq!(field, "group");

        assert!(form_field_error(&AppError::Unauthorized).is_none());
    }
}

//! Comment service.

use gazette_common::{AppError, AppResult, IdGenerator};
use gazette_db::{
    entities::comment,
    repositories::{CommentRepository, PostRepository},
};
use sea_orm::Set;

/// Input for creating a comment.
#[derive(Debug)]
pub struct CreateCommentInput {
    /// Comment text (required, non-empty after trimming).
    pub text: String,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a comment on a post.
    ///
    /// The original left its empty-text check in a dead code path; here it
    /// is enforced: whitespace-only comments are rejected.
    pub async fn create(
        &self,
        author_id: &str,
        post_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        // The target post must exist.
        let post = self.post_repo.get_by_id(post_id).await?;

        let text = input.text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("text: this field is required".to_string()));
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post.id.clone()),
            author_id: Set(author_id.to_string()),
            text: Set(text.to_string()),
            ..Default::default()
        };

        let comment = self.comment_repo.create(model).await?;
        tracing::info!(comment_id = %comment.id, post_id = %post.id, "Created comment");

        Ok(comment)
    }

    /// Get all comments on a post, in insertion order.
    pub async fn list_for_post(&self, post_id: &str) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_by_post(post_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gazette_db::entities::post;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service_with(db: DatabaseConnection) -> CommentService {
        let db = Arc::new(db);
        CommentService::new(
            CommentRepository::new(Arc::clone(&db)),
            PostRepository::new(db),
        )
    }

    fn create_test_post(id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            author_id: "u1".to_string(),
            group_id: None,
            text: "Hello".to_string(),
            image_key: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service
            .create(
                "u1",
                "missing",
                CreateCommentInput {
                    text: "Nice".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_text() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_post("p1")]])
            .into_connection();
        let service = service_with(db);

        let result = service
            .create(
                "u1",
                "p1",
                CreateCommentInput {
                    text: "   ".to_string(),
                },
            )
            .await;

        // Only the post fetch was queued: no insert may be attempted.
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_attaches_author_and_post() {
        let comment = comment::Model {
            id: "c1".to_string(),
            post_id: "p1".to_string(),
            author_id: "u2".to_string(),
            text: "Nice".to_string(),
            created_at: Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_post("p1")]])
            .append_query_results([[comment]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let service = service_with(db);

        let created = service
            .create(
                "u2",
                "p1",
                CreateCommentInput {
                    text: " Nice ".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.post_id, "p1");
        assert_eq!(created.author_id, "u2");
        assert_eq!(created.text, "Nice");
    }
}

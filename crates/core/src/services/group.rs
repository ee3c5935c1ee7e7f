//! Group service.

use gazette_common::{AppError, AppResult, IdGenerator};
use gazette_db::{entities::group, repositories::GroupRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a new group.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 100))]
    pub slug: String,

    #[serde(default)]
    pub description: String,
}

/// Group service for business logic.
#[derive(Clone)]
pub struct GroupService {
    group_repo: GroupRepository,
    id_gen: IdGenerator,
}

impl GroupService {
    /// Create a new group service.
    #[must_use]
    pub const fn new(group_repo: GroupRepository) -> Self {
        Self {
            group_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new group.
    pub async fn create(&self, input: CreateGroupInput) -> AppResult<group::Model> {
        input.validate()?;

        // Check if the slug is taken
        if self.group_repo.find_by_slug(&input.slug).await?.is_some() {
            return Err(AppError::BadRequest("Slug already taken".to_string()));
        }

        let model = group::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            slug: Set(input.slug),
            description: Set(input.description),
            ..Default::default()
        };

        let group = self.group_repo.create(model).await?;
        tracing::info!(group_id = %group.id, slug = %group.slug, "Created group");

        Ok(group)
    }

    /// Get a group by slug.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<group::Model> {
        self.group_repo.get_by_slug(slug).await
    }

    /// Batch-fetch groups by ID.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<group::Model>> {
        self.group_repo.find_by_ids(ids).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_group(id: &str, slug: &str) -> group::Model {
        group::Model {
            id: id.to_string(),
            title: "Rustaceans".to_string(),
            slug: slug.to_string(),
            description: String::new(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_empty_slug() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = GroupService::new(GroupRepository::new(db));

        let result = service
            .create(CreateGroupInput {
                title: "Rustaceans".to_string(),
                slug: String::new(),
                description: String::new(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_taken_slug() {
        let existing = create_test_group("g1", "rust");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let service = GroupService::new(GroupRepository::new(db));

        let result = service
            .create(CreateGroupInput {
                title: "Rustaceans".to_string(),
                slug: "rust".to_string(),
                description: String::new(),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_by_slug_unknown() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<group::Model>::new()])
                .into_connection(),
        );
        let service = GroupService::new(GroupRepository::new(db));

        let result = service.get_by_slug("unknown").await;

        assert!(matches!(result, Err(AppError::GroupNotFound(_))));
    }
}

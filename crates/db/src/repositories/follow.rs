//! Follow repository.

use std::sync::Arc;

use crate::entities::{Follow, follow};
use gazette_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follow edge by follower and author.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        author_id: &str,
    ) -> AppResult<Option<follow::Model>> {
        Follow::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is following an author.
    pub async fn is_following(&self, user_id: &str, author_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(user_id, author_id).await?.is_some())
    }

    /// Create a new follow edge.
    pub async fn create(&self, model: follow::ActiveModel) -> AppResult<follow::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete the follow edge for a pair, if present.
    ///
    /// Deleting a non-existent edge is not an error.
    pub async fn delete_by_pair(&self, user_id: &str, author_id: &str) -> AppResult<()> {
        let follow = self.find_by_pair(user_id, author_id).await?;
        if let Some(f) = follow {
            f.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Get the IDs of all authors a user follows.
    pub async fn find_author_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let edges = Follow::find()
            .filter(follow::Column::UserId.eq(user_id))
            .order_by_asc(follow::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(edges.into_iter().map(|f| f.author_id).collect())
    }

    /// Count followers of an author.
    pub async fn count_followers(&self, author_id: &str) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::AuthorId.eq(author_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_follow(id: &str, user_id: &str, author_id: &str) -> follow::Model {
        follow::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            author_id: author_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let follow = create_test_follow("f1", "u1", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[follow.clone()]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.find_by_pair("u1", "u2").await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.user_id, "u1");
        assert_eq!(found.author_id, "u2");
    }

    #[tokio::test]
    async fn test_is_following_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.is_following("u1", "u3").await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_delete_by_pair_missing_edge_is_ok() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        // No exec result is queued: the delete path must not be reached.
        assert!(repo.delete_by_pair("u1", "u2").await.is_ok());
    }

    #[tokio::test]
    async fn test_find_author_ids() {
        let f1 = create_test_follow("f1", "u1", "u2");
        let f2 = create_test_follow("f2", "u1", "u3");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.find_author_ids("u1").await.unwrap();

        assert_eq!(result, vec!["u2".to_string(), "u3".to_string()]);
    }
}

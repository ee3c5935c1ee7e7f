//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post};
use gazette_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Post repository for database operations.
///
/// All listing queries return posts newest-first.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Post::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all posts.
    pub async fn count_all(&self) -> AppResult<u64> {
        Post::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get one page of all posts (newest first).
    pub async fn find_page(&self, limit: u64, offset: u64) -> AppResult<Vec<post::Model>> {
        Post::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts in a group.
    pub async fn count_by_group(&self, group_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::GroupId.eq(group_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get one page of a group's posts (newest first).
    pub async fn find_page_by_group(
        &self,
        group_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::GroupId.eq(group_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts by an author.
    pub async fn count_by_author(&self, author_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get one page of an author's posts (newest first).
    pub async fn find_page_by_author(
        &self,
        author_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts by any of the given authors.
    pub async fn count_by_authors(&self, author_ids: &[String]) -> AppResult<u64> {
        if author_ids.is_empty() {
            return Ok(0);
        }

        Post::find()
            .filter(post::Column::AuthorId.is_in(author_ids.to_vec()))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get one page of posts by any of the given authors (newest first).
    pub async fn find_page_by_authors(
        &self,
        author_ids: &[String],
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post::Model>> {
        if author_ids.is_empty() {
            return Ok(vec![]);
        }

        Post::find()
            .filter(post::Column::AuthorId.is_in(author_ids.to_vec()))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn create_test_post(id: &str, author_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            group_id: None,
            text: "Hello".to_string(),
            image_key: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let post = create_test_post("p1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_by_id("p1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().author_id, "u1");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_count_all() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    btreemap! { "num_items" => Value::BigInt(Some(3)) },
                ]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let count = repo.count_all().await.unwrap();

        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_find_page() {
        let p1 = create_test_post("p2", "u1");
        let p2 = create_test_post("p1", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p1, p2]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_page(10, 0).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "p2");
    }

    #[tokio::test]
    async fn test_count_by_authors_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = PostRepository::new(db);
        let count = repo.count_by_authors(&[]).await.unwrap();

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_find_page_by_authors_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = PostRepository::new(db);
        let result = repo.find_page_by_authors(&[], 10, 0).await.unwrap();

        assert!(result.is_empty());
    }
}

//! Post service.

use std::sync::Arc;

use gazette_common::{
    AppError, AppResult, IdGenerator, PageMeta, Paginated, StorageBackend, pagination,
};
use gazette_db::{
    entities::post,
    repositories::{GroupRepository, PostRepository},
};
use sea_orm::Set;

/// An uploaded image attached to a post form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied file name.
    pub filename: String,
    /// MIME content type.
    pub content_type: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

/// Input for creating a new post.
#[derive(Debug)]
pub struct CreatePostInput {
    /// Post text (required, non-empty after trimming).
    pub text: String,
    /// Group to file the post under (optional, must exist).
    pub group_id: Option<String>,
    /// Attached image (optional).
    pub image: Option<ImageUpload>,
}

/// Input for editing a post.
///
/// The edit form always submits the full field set: `group_id: None` clears
/// the group, while `image: None` keeps the stored image.
#[derive(Debug)]
pub struct UpdatePostInput {
    pub text: String,
    pub group_id: Option<String>,
    pub image: Option<ImageUpload>,
}

/// Result of an edit attempt.
pub enum EditOutcome {
    /// The post was updated.
    Updated(post::Model),
    /// The requester is not the author; nothing was changed.
    NotAuthor,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    group_repo: GroupRepository,
    storage: Arc<dyn StorageBackend>,
    per_page: u64,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        post_repo: PostRepository,
        group_repo: GroupRepository,
        storage: Arc<dyn StorageBackend>,
        per_page: u64,
    ) -> Self {
        Self {
            post_repo,
            group_repo,
            storage,
            per_page,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new post authored by `author_id`.
    ///
    /// Validation failures leave no trace: no row is inserted and no image
    /// is stored.
    pub async fn create(&self, author_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        let text = validate_text(&input.text)?;

        // The group reference must point at an existing group.
        if let Some(ref group_id) = input.group_id {
            self.group_repo.get_by_id(group_id).await?;
        }

        let image_key = match input.image {
            Some(ref image) => Some(self.store_image(image).await?),
            None => None,
        };

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(author_id.to_string()),
            group_id: Set(input.group_id),
            text: Set(text),
            image_key: Set(image_key),
            ..Default::default()
        };

        let post = self.post_repo.create(model).await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, "Created post");

        Ok(post)
    }

    /// Edit a post.
    ///
    /// Only the author may change a post; anyone else gets
    /// [`EditOutcome::NotAuthor`] and the stored fields stay untouched.
    pub async fn update(
        &self,
        actor_id: &str,
        post_id: &str,
        input: UpdatePostInput,
    ) -> AppResult<EditOutcome> {
        let post = self.post_repo.get_by_id(post_id).await?;

        if post.author_id != actor_id {
            tracing::debug!(post_id = %post_id, actor_id = %actor_id, "Edit denied: not the author");
            return Ok(EditOutcome::NotAuthor);
        }

        let text = validate_text(&input.text)?;

        if let Some(ref group_id) = input.group_id {
            self.group_repo.get_by_id(group_id).await?;
        }

        let image_key = match input.image {
            Some(ref image) => Some(self.store_image(image).await?),
            None => post.image_key.clone(),
        };

        let mut active: post::ActiveModel = post.into();
        active.text = Set(text);
        active.group_id = Set(input.group_id);
        active.image_key = Set(image_key);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.post_repo.update(active).await?;
        tracing::info!(post_id = %updated.id, "Updated post");

        Ok(EditOutcome::Updated(updated))
    }

    /// Get a post by ID.
    pub async fn get(&self, id: &str) -> AppResult<post::Model> {
        self.post_repo.get_by_id(id).await
    }

    /// One page of all posts, newest first.
    pub async fn list_page(&self, page: Option<&str>) -> AppResult<Paginated<post::Model>> {
        let total = self.post_repo.count_all().await?;
        let meta = self.resolve(page, total);
        let items = self
            .post_repo
            .find_page(self.per_page, meta.offset())
            .await?;
        Ok(Paginated::new(items, meta))
    }

    /// One page of a group's posts, newest first.
    pub async fn list_group_page(
        &self,
        group_id: &str,
        page: Option<&str>,
    ) -> AppResult<Paginated<post::Model>> {
        let total = self.post_repo.count_by_group(group_id).await?;
        let meta = self.resolve(page, total);
        let items = self
            .post_repo
            .find_page_by_group(group_id, self.per_page, meta.offset())
            .await?;
        Ok(Paginated::new(items, meta))
    }

    /// One page of an author's posts, newest first.
    pub async fn list_author_page(
        &self,
        author_id: &str,
        page: Option<&str>,
    ) -> AppResult<Paginated<post::Model>> {
        let total = self.post_repo.count_by_author(author_id).await?;
        let meta = self.resolve(page, total);
        let items = self
            .post_repo
            .find_page_by_author(author_id, self.per_page, meta.offset())
            .await?;
        Ok(Paginated::new(items, meta))
    }

    /// One page of posts by the given authors, newest first.
    ///
    /// An empty author set short-circuits to an empty page without touching
    /// the database.
    pub async fn list_feed_page(
        &self,
        author_ids: &[String],
        page: Option<&str>,
    ) -> AppResult<Paginated<post::Model>> {
        if author_ids.is_empty() {
            return Ok(Paginated::empty(self.per_page));
        }

        let total = self.post_repo.count_by_authors(author_ids).await?;
        let meta = self.resolve(page, total);
        let items = self
            .post_repo
            .find_page_by_authors(author_ids, self.per_page, meta.offset())
            .await?;
        Ok(Paginated::new(items, meta))
    }

    fn resolve(&self, page: Option<&str>, total: u64) -> PageMeta {
        let number = pagination::resolve_page(page, total, self.per_page);
        PageMeta::new(number, total, self.per_page)
    }

    async fn store_image(&self, image: &ImageUpload) -> AppResult<String> {
        // Keep only the final path component of the client-supplied name.
        let filename = image
            .filename
            .rsplit(['/', '\\'])
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::Validation("image: invalid file name".to_string()))?;

        let key = format!("posts/{filename}");
        let stored = self
            .storage
            .upload(&key, &image.data, &image.content_type)
            .await?;

        Ok(stored.key)
    }
}

/// Strip surrounding whitespace and reject empty text.
fn validate_text(text: &str) -> AppResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("text: this field is required".to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gazette_common::NoOpStorage;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};

    fn service_with(db: DatabaseConnection) -> PostService {
        let db = Arc::new(db);
        PostService::new(
            PostRepository::new(Arc::clone(&db)),
            GroupRepository::new(db),
            Arc::new(NoOpStorage),
            10,
        )
    }

    fn create_test_post(id: &str, author_id: &str, text: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            group_id: None,
            text: text.to_string(),
            image_key: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_empty_text() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service
            .create(
                "u1",
                CreatePostInput {
                    text: String::new(),
                    group_id: None,
                    image: None,
                },
            )
            .await;

        // No query results were queued: the validation error must fire
        // before any database access.
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_whitespace_text() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service
            .create(
                "u1",
                CreatePostInput {
                    text: "   \n\t ".to_string(),
                    group_id: None,
                    image: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_group() {
        use gazette_db::entities::group;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<group::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service
            .create(
                "u1",
                CreatePostInput {
                    text: "Hello".to_string(),
                    group_id: Some("missing".to_string()),
                    image: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::GroupNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_stamps_author_and_trims_text() {
        let inserted = create_test_post("p1", "u1", "Hello");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[inserted.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let service = service_with(db);

        let post = service
            .create(
                "u1",
                CreatePostInput {
                    text: "  Hello  ".to_string(),
                    group_id: None,
                    image: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(post.author_id, "u1");
        assert_eq!(post.text, "Hello");
    }

    #[tokio::test]
    async fn test_update_by_non_author_is_silently_denied() {
        let post = create_test_post("p1", "u1", "Original");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post]])
            .into_connection();
        let service = service_with(db);

        let result = service
            .update(
                "u2",
                "p1",
                UpdatePostInput {
                    text: "Hijacked".to_string(),
                    group_id: None,
                    image: None,
                },
            )
            .await
            .unwrap();

        // Only the initial fetch was queued: reaching the update statement
        // would error on the mock.
        assert!(matches!(result, EditOutcome::NotAuthor));
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service
            .update(
                "u1",
                "missing",
                UpdatePostInput {
                    text: "New".to_string(),
                    group_id: None,
                    image: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_by_author_rejects_empty_text() {
        let post = create_test_post("p1", "u1", "Original");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post]])
            .into_connection();
        let service = service_with(db);

        let result = service
            .update(
                "u1",
                "p1",
                UpdatePostInput {
                    text: "  ".to_string(),
                    group_id: None,
                    image: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_feed_page_with_no_followed_authors() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let page = service.list_feed_page(&[], None).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_items, 0);
        assert_eq!(page.meta.total_pages, 1);
    }

    #[tokio::test]
    async fn test_list_feed_page_returns_followed_authors_posts() {
        let followed_post = create_test_post("p1", "u2", "From bob");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                btreemap! { "num_items" => Value::BigInt(Some(1)) },
            ]])
            .append_query_results([[followed_post]])
            .into_connection();
        let service = service_with(db);

        let page = service
            .list_feed_page(&["u2".to_string()], None)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].author_id, "u2");
        assert_eq!(page.meta.total_items, 1);
    }

    #[tokio::test]
    async fn test_list_page_metadata() {
        let p1 = create_test_post("p3", "u1", "C");
        let p2 = create_test_post("p2", "u1", "B");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                btreemap! { "num_items" => Value::BigInt(Some(12)) },
            ]])
            .append_query_results([[p1, p2]])
            .into_connection();
        let service = service_with(db);

        let page = service.list_page(None).await.unwrap();

        assert_eq!(page.meta.number, 1);
        assert_eq!(page.meta.total_items, 12);
        assert_eq!(page.meta.total_pages, 2);
        assert!(page.meta.has_next);
        assert!(!page.meta.has_previous);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_list_page_out_of_range_fails_over_to_last() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                btreemap! { "num_items" => Value::BigInt(Some(12)) },
            ]])
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let page = service.list_page(Some("99")).await.unwrap();

        assert_eq!(page.meta.number, 2);
        assert!(!page.meta.has_next);
        assert!(page.meta.has_previous);
    }
}

//! Follow service.

use gazette_common::{AppResult, IdGenerator};
use gazette_db::{entities::follow, repositories::FollowRepository};
use sea_orm::Set;

/// Result of a follow attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum FollowOutcome {
    /// A new follow edge was created.
    Followed,
    /// The edge already existed; nothing was created.
    AlreadyFollowing,
    /// The requester tried to follow themselves; nothing was created.
    SelfFollow,
}

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository) -> Self {
        Self {
            follow_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow an author.
    ///
    /// Idempotent: an existing edge is left alone, and a self-follow attempt
    /// is silently skipped. Callers treat every outcome as success.
    pub async fn follow(&self, user_id: &str, author_id: &str) -> AppResult<FollowOutcome> {
        if user_id == author_id {
            return Ok(FollowOutcome::SelfFollow);
        }

        if self.follow_repo.is_following(user_id, author_id).await? {
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            author_id: Set(author_id.to_string()),
            ..Default::default()
        };

        self.follow_repo.create(model).await?;
        tracing::info!(user_id = %user_id, author_id = %author_id, "Created follow");

        Ok(FollowOutcome::Followed)
    }

    /// Unfollow an author.
    ///
    /// Idempotent: deleting a non-existent edge is not an error.
    pub async fn unfollow(&self, user_id: &str, author_id: &str) -> AppResult<()> {
        self.follow_repo.delete_by_pair(user_id, author_id).await?;
        tracing::debug!(user_id = %user_id, author_id = %author_id, "Removed follow if present");
        Ok(())
    }

    /// Check if a user is following an author.
    pub async fn is_following(&self, user_id: &str, author_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(user_id, author_id).await
    }

    /// IDs of all authors a user follows.
    pub async fn followed_author_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        self.follow_repo.find_author_ids(user_id).await
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Comment, Post, PostStatus};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository.
///
/// Lookups return records of every status; public read paths filter them
/// through `query::visibility`. Deleting a post deletes its comments.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts with the given status, newest publish timestamp first.
    async fn find_by_status(&self, status: PostStatus) -> Result<Vec<Post>, RepoError>;

    /// Posts with `slug` whose publish timestamp falls on `date` (UTC).
    async fn find_by_slug_and_date(
        &self,
        slug: &str,
        date: NaiveDate,
    ) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments of a post in creation order, active or not.
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

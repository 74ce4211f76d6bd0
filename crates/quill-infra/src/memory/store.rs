//! In-memory post and comment store.
//!
//! Data is lost on process restart.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Post, PostStatus};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository};

/// Posts and comments held in `HashMap`s behind async `RwLock`s.
///
/// Implements both repository ports so a single store can back the whole
/// service, keeping the post/comment ownership rule in one place.
#[derive(Default)]
pub struct InMemoryBlogStore {
    posts: RwLock<HashMap<Uuid, Post>>,
    comments: RwLock<HashMap<Uuid, Comment>>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let date = post.publish_date();
        let taken = posts
            .values()
            .any(|p| p.id != post.id && p.slug == post.slug && p.publish_date() == date);
        if taken {
            return Err(RepoError::Duplicate("slug"));
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // Lock order is posts then comments, as in comment `save`.
        let mut posts = self.posts.write().await;
        if posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        // Comments are owned by their post
        let mut comments = self.comments.write().await;
        comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn find_by_status(&self, status: PostStatus) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut found: Vec<Post> = posts
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect();
        found.sort_by_key(|p| Reverse(p.publish));
        Ok(found)
    }

    async fn find_by_slug_and_date(
        &self,
        slug: &str,
        date: NaiveDate,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut found: Vec<Post> = posts
            .values()
            .filter(|p| p.slug == slug && p.publish_date() == date)
            .cloned()
            .collect();
        found.sort_by_key(|p| Reverse(p.publish));
        Ok(found)
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let comments = self.comments.read().await;
        Ok(comments.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        // Held until the insert so the post cannot be deleted in between.
        let posts = self.posts.read().await;
        if !posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "comment references missing post {}",
                comment.post_id
            )));
        }
        let mut comments = self.comments.write().await;
        comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut comments = self.comments.write().await;
        comments.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let comments = self.comments.read().await;
        let mut found: Vec<Comment> = comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        found.sort_by_key(|c| c.created_at);
        Ok(found)
    }
}

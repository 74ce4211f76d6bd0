//! Blog use cases composed from the ports and the query pipeline.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Comment, Post, PostStatus, slugify};
use crate::error::{DomainError, FieldErrors, RepoError};
use crate::forms::{CommentForm, EmailPostForm, PostForm};
use crate::ports::{CommentRepository, EmailMessage, Mailer, PostRepository};
use crate::query::search::{self, SearchHit};
use crate::query::similarity::{self, SIMILAR_POSTS_LIMIT, SimilarPost};
use crate::query::{Page, Paginator, visibility};

/// A published post with its visible comments and related posts.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub similar: Vec<SimilarPost>,
}

/// Result of a share request that passed validation.
#[derive(Debug, Clone)]
pub struct ShareOutcome {
    pub post: Post,
    pub post_url: String,
    pub recipient: String,
    pub sent: bool,
}

/// Blog application service.
///
/// Public read operations only ever see published posts; editorial
/// operations (`create_post`, `update_post`, `set_status`,
/// `set_comment_active`) work on every record.
#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    mailer: Arc<dyn Mailer>,
    paginator: Paginator,
    site_url: String,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        mailer: Arc<dyn Mailer>,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            posts,
            comments,
            mailer,
            paginator: Paginator::default(),
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL of a post, including the site origin.
    pub fn post_url(&self, post: &Post) -> String {
        format!("{}{}", self.site_url, post.absolute_url())
    }

    async fn published_posts(&self) -> Result<Vec<Post>, DomainError> {
        let posts = self.posts.find_by_status(PostStatus::Published).await?;
        Ok(visibility::published(posts))
    }

    /// Published post by id, or not-found.
    pub async fn published_post(&self, id: Uuid) -> Result<Post, DomainError> {
        visibility::public_only(self.posts.find_by_id(id).await?)
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// One page of published posts, newest first, optionally limited to a tag.
    pub async fn list_posts(
        &self,
        tag_slug: Option<&str>,
        page: Option<&str>,
    ) -> Result<Page<Post>, DomainError> {
        let mut posts = self.published_posts().await?;
        if let Some(slug) = tag_slug {
            posts.retain(|post| post.has_tag_slug(slug));
        }
        Ok(self.paginator.get_page(posts, page))
    }

    /// Published post addressed by its publish date and slug.
    pub async fn post_detail(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
    ) -> Result<PostDetail, DomainError> {
        let key = format!("{}/{}/{}/{}", year, month, day, slug);
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DomainError::not_found("Post", &key))?;

        let post = visibility::published(self.posts.find_by_slug_and_date(slug, date).await?)
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found("Post", &key))?;

        let comments = self.active_comments(post.id).await?;
        let similar = self.similar_posts(&post).await?;

        Ok(PostDetail {
            post,
            comments,
            similar,
        })
    }

    /// Active comments of a post, oldest first.
    pub async fn active_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let mut comments = self.comments.find_by_post_id(post_id).await?;
        comments.retain(|c| c.active);
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    /// Up to four published posts sharing the most tags with `post`.
    pub async fn similar_posts(&self, post: &Post) -> Result<Vec<SimilarPost>, DomainError> {
        if post.tags.is_empty() || !visibility::is_public(post) {
            return Ok(Vec::new());
        }
        let candidates = self.published_posts().await?;
        Ok(similarity::similar_posts(
            post,
            &candidates,
            SIMILAR_POSTS_LIMIT,
        ))
    }

    /// Published posts matching `query`, best match first.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<SearchHit>, DomainError> {
        let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return Ok(Vec::new());
        };
        let hits = search::search(self.published_posts().await?, query);
        tracing::debug!(query = %query, results = hits.len(), "Search executed");
        Ok(hits)
    }

    /// Attach a reader comment to a published post.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        form: CommentForm,
    ) -> Result<Comment, DomainError> {
        let post = self.published_post(post_id).await?;
        let form = form.clean()?;

        let comment = Comment::new(post.id, form.name, form.email, form.body);
        let saved = self.comments.save(comment).await?;

        tracing::info!(post_id = %post.id, comment_id = %saved.id, "Comment created");
        Ok(saved)
    }

    /// Email a link to a published post on behalf of a reader.
    ///
    /// Transport failures are reported through `ShareOutcome::sent`.
    pub async fn share_post(
        &self,
        post_id: Uuid,
        form: EmailPostForm,
    ) -> Result<ShareOutcome, DomainError> {
        let post = self.published_post(post_id).await?;
        let form = form.clean()?;

        let post_url = self.post_url(&post);
        let message = EmailMessage {
            to: form.to.clone(),
            subject: format!("{} recommends you read {}", form.name, post.title),
            body: format!(
                "Read {} at {}\n\n{}'s comments: {}",
                post.title, post_url, form.name, form.comments
            ),
        };

        let sent = match self.mailer.send(message).await {
            Ok(()) => {
                tracing::info!(post_id = %post.id, "Post shared by email");
                true
            }
            Err(e) => {
                tracing::error!(post_id = %post.id, error = %e, "Failed to send share email");
                false
            }
        };

        Ok(ShareOutcome {
            post,
            post_url,
            recipient: form.to,
            sent,
        })
    }

    /// Create a post for `author_id`.
    pub async fn create_post(&self, author_id: Uuid, form: PostForm) -> Result<Post, DomainError> {
        let form = form.clean()?;
        let slug = Self::resolve_slug(&form)?;

        let mut post = Post::new(author_id, form.title, slug, form.body)
            .with_status(form.status)
            .with_tags(form.tags);
        if let Some(publish) = form.publish {
            post = post.with_publish(publish);
        }

        self.ensure_unique_slug(&post).await?;
        let saved = self.save_post(post).await?;
        tracing::info!(post_id = %saved.id, status = %saved.status, "Post created");
        Ok(saved)
    }

    /// Replace the editable fields of an existing post.
    pub async fn update_post(&self, id: Uuid, form: PostForm) -> Result<Post, DomainError> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        let form = form.clean()?;
        post.slug = Self::resolve_slug(&form)?;
        post.title = form.title;
        post.body = form.body;
        post.status = form.status;
        post.tags = form.tags.into_iter().collect();
        if let Some(publish) = form.publish {
            post.publish = publish;
        }
        post.updated_at = Utc::now();

        self.ensure_unique_slug(&post).await?;
        let saved = self.save_post(post).await?;
        tracing::info!(post_id = %saved.id, "Post updated");
        Ok(saved)
    }

    /// Publish or unpublish a post.
    pub async fn set_status(&self, id: Uuid, status: PostStatus) -> Result<Post, DomainError> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        post.status = status;
        post.updated_at = Utc::now();
        let saved = self.save_post(post).await?;
        tracing::info!(post_id = %saved.id, status = %saved.status, "Post status changed");
        Ok(saved)
    }

    /// Show or hide a comment.
    pub async fn set_comment_active(&self, id: Uuid, active: bool) -> Result<Comment, DomainError> {
        let mut comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))?;

        comment.set_active(active);
        let saved = self.comments.save(comment).await?;
        tracing::info!(comment_id = %saved.id, active, "Comment moderated");
        Ok(saved)
    }

    fn resolve_slug(form: &PostForm) -> Result<String, FieldErrors> {
        let slug = if form.slug.is_empty() {
            slugify(&form.title)
        } else {
            slugify(&form.slug)
        };
        if slug.is_empty() {
            let mut errors = FieldErrors::new();
            errors.add("slug", "Enter a valid slug.");
            return Err(errors);
        }
        Ok(slug)
    }

    async fn ensure_unique_slug(&self, post: &Post) -> Result<(), DomainError> {
        let clash = self
            .posts
            .find_by_slug_and_date(&post.slug, post.publish_date())
            .await?
            .into_iter()
            .any(|other| other.id != post.id);

        if clash {
            return Err(slug_taken().into());
        }
        Ok(())
    }

    /// Save a post; a slug/date clash caught by storage is a `slug` field error.
    async fn save_post(&self, post: Post) -> Result<Post, DomainError> {
        match self.posts.save(post).await {
            Err(RepoError::Duplicate("slug")) => Err(slug_taken().into()),
            other => Ok(other?),
        }
    }
}

fn slug_taken() -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.add("slug", "Slug must be unique for the publish date.");
    errors
}

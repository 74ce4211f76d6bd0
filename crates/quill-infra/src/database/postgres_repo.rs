//! PostgreSQL repository implementations.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Comment, Post, PostStatus, slugify};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};

fn query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

/// Unique index over a post's slug and UTC publish date.
const SLUG_DATE_INDEX: &str = "idx_posts_slug_publish_date";

fn write_err(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains(SLUG_DATE_INDEX) {
        RepoError::Duplicate("slug")
    } else if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Entity already exists".to_string())
    } else if err_str.contains("foreign key") {
        RepoError::Constraint("Referenced entity does not exist".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

/// PostgreSQL post repository. Tags live in `tags` and `post_tags`.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Convert rows to domain posts with their tag names filled in.
    async fn with_tags(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        let post_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut tags_by_post: HashMap<Uuid, BTreeSet<String>> = HashMap::new();

        if !post_ids.is_empty() {
            let links = PostTagEntity::find()
                .filter(post_tag::Column::PostId.is_in(post_ids))
                .all(&self.db)
                .await
                .map_err(query_err)?;

            if !links.is_empty() {
                let tag_ids: BTreeSet<Uuid> = links.iter().map(|l| l.tag_id).collect();
                let names: HashMap<Uuid, String> = TagEntity::find()
                    .filter(tag::Column::Id.is_in(tag_ids))
                    .all(&self.db)
                    .await
                    .map_err(query_err)?
                    .into_iter()
                    .map(|t| (t.id, t.name))
                    .collect();

                for link in links {
                    if let Some(name) = names.get(&link.tag_id) {
                        tags_by_post
                            .entry(link.post_id)
                            .or_default()
                            .insert(name.clone());
                    }
                }
            }
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let tags = tags_by_post.remove(&model.id).unwrap_or_default();
                let mut post = Post::from(model);
                post.tags = tags;
                post
            })
            .collect())
    }

    /// Point the post's tag links at `names`, creating missing tags.
    async fn replace_tags<C>(conn: &C, post_id: Uuid, names: &BTreeSet<String>) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(conn)
            .await?;

        for name in names {
            let existing = TagEntity::find()
                .filter(tag::Column::Name.eq(name.as_str()))
                .one(conn)
                .await?;

            let tag_id = match existing {
                Some(tag) => tag.id,
                None => {
                    let id = Uuid::new_v4();
                    TagEntity::insert(tag::ActiveModel {
                        id: sea_orm::Set(id),
                        name: sea_orm::Set(name.clone()),
                        slug: sea_orm::Set(slugify(name)),
                    })
                    .exec(conn)
                    .await?;
                    id
                }
            };

            PostTagEntity::insert(post_tag::ActiveModel {
                post_id: sea_orm::Set(post_id),
                tag_id: sea_orm::Set(tag_id),
            })
            .exec(conn)
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        match model {
            Some(model) => Ok(self.with_tags(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_err)?;

        PostEntity::insert(post::ActiveModel::from(&post))
            .on_conflict(
                OnConflict::column(post::Column::Id)
                    .update_columns([
                        post::Column::AuthorId,
                        post::Column::Title,
                        post::Column::Slug,
                        post::Column::Body,
                        post::Column::Publish,
                        post::Column::UpdatedAt,
                        post::Column::Status,
                    ])
                    .to_owned(),
            )
            .exec(&txn)
            .await
            .map_err(write_err)?;

        Self::replace_tags(&txn, post.id, &post.tags)
            .await
            .map_err(write_err)?;

        txn.commit().await.map_err(query_err)?;
        tracing::debug!(post_id = %post.id, tags = post.tags.len(), "Post saved");
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // comments and post_tags rows cascade
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_status(&self, status: PostStatus) -> Result<Vec<Post>, RepoError> {
        let models = PostEntity::find()
            .filter(post::Column::Status.eq(post::Status::from(status)))
            .order_by_desc(post::Column::Publish)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        self.with_tags(models).await
    }

    async fn find_by_slug_and_date(
        &self,
        slug: &str,
        date: NaiveDate,
    ) -> Result<Vec<Post>, RepoError> {
        let start = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| RepoError::Query(format!("invalid date {}", date)))?
            .and_utc();
        let end = start + Duration::days(1);

        let models = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Publish.gte(DateTimeWithTimeZone::from(start)))
            .filter(post::Column::Publish.lt(DateTimeWithTimeZone::from(end)))
            .order_by_desc(post::Column::Publish)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        self.with_tags(models).await
    }
}

/// PostgreSQL comment repository.
pub struct PostgresCommentRepository {
    db: DbConn,
}

impl PostgresCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for PostgresCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        CommentEntity::insert(comment::ActiveModel::from(&comment))
            .on_conflict(
                OnConflict::column(comment::Column::Id)
                    .update_columns([
                        comment::Column::Name,
                        comment::Column::Email,
                        comment::Column::Body,
                        comment::Column::UpdatedAt,
                        comment::Column::Active,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(write_err)?;

        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = CommentEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

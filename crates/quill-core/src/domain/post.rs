use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tag::Tag;

/// Visibility state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    /// Two-letter code used by the persistence layer.
    pub fn code(&self) -> &'static str {
        match self {
            PostStatus::Draft => "DF",
            PostStatus::Published => "PB",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DF" => Some(PostStatus::Draft),
            "PB" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "Draft"),
            PostStatus::Published => write!(f, "Published"),
        }
    }
}

/// Post entity - a blog article written by an author.
///
/// `slug` is unique among posts sharing the same publish date (UTC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: PostStatus,
    pub tags: BTreeSet<String>,
}

impl Post {
    /// Create a new draft post published "now".
    pub fn new(author_id: Uuid, title: String, slug: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            body,
            publish: now,
            created_at: now,
            updated_at: now,
            status: PostStatus::Draft,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_publish(mut self, publish: DateTime<Utc>) -> Self {
        self.publish = publish;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    pub fn publish_date(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    /// Canonical path of the post: `/<year>/<month>/<day>/<slug>/`.
    pub fn absolute_url(&self) -> String {
        format!(
            "/{}/{}/{}/{}/",
            self.publish.year(),
            self.publish.month(),
            self.publish.day(),
            self.slug
        )
    }

    pub fn tag_list(&self) -> Vec<Tag> {
        self.tags.iter().map(|name| Tag::new(name.clone())).collect()
    }

    pub fn has_tag_slug(&self, slug: &str) -> bool {
        self.tag_list().iter().any(|tag| tag.slug == slug)
    }

    /// Number of tags this post shares with `other`.
    pub fn shared_tag_count(&self, other: &Post) -> usize {
        self.tags.intersection(&other.tags).count()
    }
}

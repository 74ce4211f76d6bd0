//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query string of the listing endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
}

/// Query string of the search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub name: String,
    pub slug: String,
}

/// Public view of a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_id: Uuid,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub tags: Vec<TagResponse>,
    pub url: String,
}

/// Pagination metadata of a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub has_next: bool,
    pub has_previous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub page: PageMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarPostResponse {
    pub post: PostResponse,
    pub same_tags: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub similar_posts: Vec<SimilarPostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultResponse {
    pub post: PostResponse,
    pub rank: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<SearchResultResponse>,
}

/// Description of one input of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub kind: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl FormField {
    pub fn new(name: &str, kind: &str, required: bool, max_length: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            required,
            max_length,
        }
    }
}

/// Share form rendered for `GET /{post_id}/share/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareFormResponse {
    pub post: PostResponse,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    pub sent: bool,
    pub recipient: String,
    pub post_url: String,
}

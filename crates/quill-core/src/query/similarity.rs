//! Tag-overlap ranking of related posts.

use std::cmp::Reverse;

use serde::Serialize;

use super::visibility;
use crate::domain::Post;

/// Maximum number of related posts returned for a post.
pub const SIMILAR_POSTS_LIMIT: usize = 4;

/// A published post related to another through shared tags.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarPost {
    pub post: Post,
    pub same_tags: usize,
}

/// Rank `candidates` by how many tags they share with `post`.
///
/// Only other published posts sharing at least one tag qualify. Ordered by
/// shared tag count, then by publish timestamp, both descending.
pub fn similar_posts(post: &Post, candidates: &[Post], limit: usize) -> Vec<SimilarPost> {
    if post.tags.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<SimilarPost> = candidates
        .iter()
        .filter(|candidate| candidate.id != post.id && visibility::is_public(candidate))
        .filter_map(|candidate| {
            let same_tags = post.shared_tag_count(candidate);
            (same_tags > 0).then(|| SimilarPost {
                post: candidate.clone(),
                same_tags,
            })
        })
        .collect();

    ranked.sort_by_key(|s| (Reverse(s.same_tags), Reverse(s.post.publish)));
    ranked.truncate(limit);
    ranked
}

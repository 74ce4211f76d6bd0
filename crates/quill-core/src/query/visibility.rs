//! Public visibility rules.
//!
//! Only published posts are exposed to readers. Every public read path runs
//! its results through these functions; editorial code works on the raw
//! repository output instead.

use crate::domain::Post;

pub fn is_public(post: &Post) -> bool {
    post.is_published()
}

/// Keep only published posts, preserving order.
pub fn published(posts: Vec<Post>) -> Vec<Post> {
    posts.into_iter().filter(is_public).collect()
}

/// `Some(post)` only if it is published.
pub fn public_only(post: Option<Post>) -> Option<Post> {
    post.filter(is_public)
}

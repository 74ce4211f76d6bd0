//! Full-text search over post titles and bodies.
//!
//! Each post is reduced to a weighted term vector (title terms count double).
//! A query matches a post only when every query term appears in it; matching
//! posts are ranked by length-normalized weighted term frequency.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use super::visibility;
use crate::domain::Post;

const TITLE_WEIGHT: f32 = 2.0;
const BODY_WEIGHT: f32 = 1.0;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "of", "on",
    "or", "that", "the", "this", "to", "was", "with",
];

/// Split text into lowercase alphanumeric terms, dropping stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

/// A parsed, non-empty search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    /// Returns `None` when the query has no searchable terms.
    pub fn parse(query: &str) -> Option<Self> {
        let mut terms = tokenize(query);
        terms.sort();
        terms.dedup();
        (!terms.is_empty()).then_some(Self { terms })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Weighted term frequencies of a post's title and body.
#[derive(Debug, Clone, Default)]
pub struct SearchVector {
    weights: HashMap<String, f32>,
    length: usize,
}

impl SearchVector {
    pub fn from_post(post: &Post) -> Self {
        let mut vector = Self::default();
        vector.add_field(&post.title, TITLE_WEIGHT);
        vector.add_field(&post.body, BODY_WEIGHT);
        vector
    }

    fn add_field(&mut self, text: &str, weight: f32) {
        for term in tokenize(text) {
            *self.weights.entry(term).or_insert(0.0) += weight;
            self.length += 1;
        }
    }

    /// Relevance of this vector to `query`; zero unless every term matches.
    pub fn rank(&self, query: &SearchQuery) -> f32 {
        let mut score = 0.0;
        for term in query.terms() {
            match self.weights.get(term) {
                Some(weight) => score += weight,
                None => return 0.0,
            }
        }
        score / (1.0 + (self.length as f32).ln())
    }
}

/// A matched post and its rank.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub post: Post,
    pub rank: f32,
}

/// Rank published posts against `query`, best match first.
///
/// Blank queries and queries matching nothing yield an empty result.
pub fn search(posts: Vec<Post>, query: &str) -> Vec<SearchHit> {
    let Some(query) = SearchQuery::parse(query) else {
        return Vec::new();
    };

    let mut hits: Vec<SearchHit> = visibility::published(posts)
        .into_iter()
        .filter_map(|post| {
            let rank = SearchVector::from_post(&post).rank(&query);
            (rank > 0.0).then_some(SearchHit { post, rank })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.rank
            .partial_cmp(&a.rank)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.post.publish.cmp(&a.post.publish))
    });
    hits
}

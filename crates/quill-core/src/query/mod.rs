//! The content-query pipeline applied to public read paths.

pub mod pagination;
pub mod search;
pub mod similarity;
pub mod visibility;

pub use pagination::{POSTS_PER_PAGE, Page, Paginator};
pub use search::{SearchHit, SearchQuery, SearchVector};
pub use similarity::{SIMILAR_POSTS_LIMIT, SimilarPost};

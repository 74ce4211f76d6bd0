//! In-memory content store - used when no database is configured.

mod store;

pub use store::InMemoryBlogStore;

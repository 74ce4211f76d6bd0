//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the content stores and mail transports.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store and console mail only
//! - `postgres` - PostgreSQL content store via SeaORM
//! - `smtp` - SMTP mail delivery via lettre

pub mod database;
pub mod mail;
pub mod memory;

// Re-exports - always available
pub use database::DatabaseConfig;
pub use mail::{ConsoleMailer, SmtpConfig};
pub use memory::InMemoryBlogStore;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresCommentRepository, PostgresPostRepository};

#[cfg(feature = "smtp")]
pub use mail::SmtpMailer;

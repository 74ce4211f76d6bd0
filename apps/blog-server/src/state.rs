//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::BlogService;
use quill_core::ports::{CommentRepository, Mailer, PostRepository};
use quill_infra::{ConsoleMailer, InMemoryBlogStore};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use quill_infra::{DatabaseConnections, PostgresCommentRepository, PostgresPostRepository};

#[cfg(feature = "smtp")]
use quill_infra::SmtpMailer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    /// Which content store backs the service, reported by `/health`.
    pub storage: &'static str,
}

type Repositories = (
    Arc<dyn PostRepository>,
    Arc<dyn CommentRepository>,
    &'static str,
);

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (posts, comments, storage) = Self::repositories(config).await;
        let mailer = Self::mailer(config);

        tracing::info!(storage, site_url = %config.site_url, "Application state initialized");

        Self {
            blog: BlogService::new(posts, comments, mailer, config.site_url.clone()),
            storage,
        }
    }

    /// State over an in-memory store and the given mailer.
    #[cfg(test)]
    pub fn in_memory(
        store: Arc<InMemoryBlogStore>,
        mailer: Arc<dyn Mailer>,
        site_url: &str,
    ) -> Self {
        Self {
            blog: BlogService::new(store.clone(), store, mailer, site_url),
            storage: "memory",
        }
    }

    fn memory_repositories() -> Repositories {
        let store = Arc::new(InMemoryBlogStore::new());
        (store.clone(), store, "memory")
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::memory_repositories();
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => (
                Arc::new(PostgresPostRepository::new(connections.main.clone())),
                Arc::new(PostgresCommentRepository::new(connections.main)),
                "postgres",
            ),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::memory_repositories()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(config: &AppConfig) -> Repositories {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        tracing::info!("Running without postgres feature - using in-memory repository");
        Self::memory_repositories()
    }

    #[cfg(feature = "smtp")]
    fn mailer(config: &AppConfig) -> Arc<dyn Mailer> {
        let Some(smtp) = config.smtp.as_ref() else {
            tracing::warn!(from = %config.mail_from, "SMTP_HOST not set. Shared posts are written to the log.");
            return console_mailer();
        };

        match SmtpMailer::new(smtp) {
            Ok(mailer) => Arc::new(mailer),
            Err(e) => {
                tracing::error!("Failed to configure SMTP: {}. Using console mailer.", e);
                console_mailer()
            }
        }
    }

    #[cfg(not(feature = "smtp"))]
    fn mailer(config: &AppConfig) -> Arc<dyn Mailer> {
        if config.smtp.is_some() {
            tracing::warn!("SMTP_HOST ignored: built without the smtp feature");
        }
        tracing::info!(from = %config.mail_from, "Using console mailer");
        console_mailer()
    }
}

/// Console fallback that logs and drops every message.
fn console_mailer() -> Arc<dyn Mailer> {
    Arc::new(ConsoleMailer::with_capacity(0))
}

//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::{DatabaseConfig, SmtpConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Origin prepended to post paths in shared links.
    pub site_url: String,
    pub database: Option<DatabaseConfig>,
    pub mail_from: String,
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("PORT", 8080);

        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", 20),
            min_connections: parse_var("DB_MIN_CONNECTIONS", 2),
        });

        let mail_from = env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@localhost".to_string());

        let smtp = env::var("SMTP_HOST").ok().map(|smtp_host| SmtpConfig {
            host: smtp_host,
            port: parse_var("SMTP_PORT", 587),
            username: env::var("SMTP_USERNAME").ok(),
            password: env::var("SMTP_PASSWORD").ok(),
            tls: env::var("SMTP_TLS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            from: mail_from.clone(),
        });

        Self {
            site_url: env::var("SITE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port)),
            host,
            port,
            database,
            mail_from,
            smtp,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

//! Outbound mail port.

use async_trait::async_trait;

/// A plain-text message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mail transport - abstraction over SMTP and development backends.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a single message. The sender address is transport configuration.
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

/// Mail delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

//! Console mail transport - logs messages instead of delivering them.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quill_core::ports::{EmailMessage, MailError, Mailer};

use super::mask_email;

/// Messages kept by a default [`ConsoleMailer`].
pub const OUTBOX_CAPACITY: usize = 32;

/// Mailer that writes every message to the log and keeps the most recent
/// ones in a bounded outbox.
///
/// Used when no SMTP host is configured. Nothing leaves the process.
pub struct ConsoleMailer {
    outbox: Mutex<VecDeque<EmailMessage>>,
    capacity: usize,
}

impl Default for ConsoleMailer {
    fn default() -> Self {
        Self::with_capacity(OUTBOX_CAPACITY)
    }
}

impl ConsoleMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` messages; zero logs and drops everything.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outbox: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Most recent messages "sent", oldest first.
    pub async fn outbox(&self) -> Vec<EmailMessage> {
        self.outbox.lock().await.iter().cloned().collect()
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %mask_email(&message.to),
            subject = %message.subject,
            body = %message.body,
            "Email (console transport)"
        );
        if self.capacity == 0 {
            return Ok(());
        }
        let mut outbox = self.outbox.lock().await;
        if outbox.len() == self.capacity {
            outbox.pop_front();
        }
        outbox.push_back(message);
        Ok(())
    }
}

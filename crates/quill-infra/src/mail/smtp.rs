//! SMTP mail transport using lettre.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use quill_core::ports::{EmailMessage, MailError, Mailer};

use super::{SmtpConfig, mask_email};

/// Mailer delivering through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|_| MailError::InvalidAddress(config.from.clone()))?;

        let mut builder = if config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| MailError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        tracing::info!(
            host = %config.host,
            port = config.port,
            tls = config.tls,
            "SMTP mailer configured"
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, message: EmailMessage) -> Result<Message, MailError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|_| MailError::InvalidAddress(message.to.clone()))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body)
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        let recipient = mask_email(&message.to);
        let email = self.build_message(message)?;
        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        tracing::debug!(to = %recipient, "Email delivered via SMTP");
        Ok(())
    }
}

//! Mail transports - SMTP delivery and a console fallback for development.

mod console;

#[cfg(feature = "smtp")]
mod smtp;

pub use console::ConsoleMailer;

#[cfg(feature = "smtp")]
pub use smtp::SmtpMailer;

/// SMTP connection settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Use STARTTLS; disable only for local relays such as a mail catcher.
    pub tls: bool,
    /// Sender address of every outgoing message.
    pub from: String,
}

/// Mask the local part of an address for logging: `bob@example.com` -> `b***@example.com`.
pub(crate) fn mask_email(address: &str) -> String {
    match address.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("bob@example.com"), "b***@example.com");
        assert_eq!(mask_email("@example.com"), "***@example.com");
        assert_eq!(mask_email("nonsense"), "***");
    }
}

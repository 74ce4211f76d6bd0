//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod mailer;
mod repository;

pub use mailer::{EmailMessage, MailError, Mailer};
pub use repository::{BaseRepository, CommentRepository, PostRepository};

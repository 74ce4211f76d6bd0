//! Submission forms and their validation rules.
//!
//! Every form is trimmed before validation, so whitespace-only input counts
//! as missing. `clean` returns either the normalized form or field errors.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::PostStatus;
use crate::error::FieldErrors;

/// Reader comment on a published post.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(
        custom(function = "required"),
        length(max = 80, message = "Ensure this value has at most 80 characters.")
    )]
    pub name: String,

    #[validate(
        custom(function = "required"),
        email(message = "Enter a valid email address.")
    )]
    pub email: String,

    #[validate(custom(function = "required"))]
    pub body: String,
}

impl CommentForm {
    pub fn clean(self) -> Result<Self, FieldErrors> {
        let form = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            body: self.body.trim().to_string(),
        };
        form.validate()?;
        Ok(form)
    }
}

/// "Share this post" referral form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct EmailPostForm {
    #[validate(
        custom(function = "required"),
        length(max = 25, message = "Ensure this value has at most 25 characters.")
    )]
    pub name: String,

    #[validate(
        custom(function = "required"),
        email(message = "Enter a valid email address.")
    )]
    pub email: String,

    #[validate(
        custom(function = "required"),
        email(message = "Enter a valid email address.")
    )]
    pub to: String,

    pub comments: String,
}

impl EmailPostForm {
    pub fn clean(self) -> Result<Self, FieldErrors> {
        let form = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            to: self.to.trim().to_string(),
            comments: self.comments.trim().to_string(),
        };
        form.validate()?;
        Ok(form)
    }
}

/// Author input for creating or editing a post.
///
/// An empty `slug` is derived from the title.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PostForm {
    #[validate(
        custom(function = "required"),
        length(max = 250, message = "Ensure this value has at most 250 characters.")
    )]
    pub title: String,

    #[validate(length(max = 250, message = "Ensure this value has at most 250 characters."))]
    pub slug: String,

    #[validate(custom(function = "required"))]
    pub body: String,

    #[validate(custom(function = "tag_names"))]
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub publish: Option<DateTime<Utc>>,
}

impl PostForm {
    pub fn clean(self) -> Result<Self, FieldErrors> {
        let tags: Vec<String> = self
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let form = Self {
            title: self.title.trim().to_string(),
            slug: self.slug.trim().to_string(),
            body: self.body.trim().to_string(),
            tags,
            ..self
        };
        form.validate()?;
        Ok(form)
    }
}

/// Longest tag name storage accepts.
pub const MAX_TAG_LENGTH: usize = 100;

fn tag_names(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().any(|t| t.chars().count() > MAX_TAG_LENGTH) {
        return Err(ValidationError::new("length")
            .with_message(Cow::Owned(format!(
                "Ensure each tag has at most {} characters.",
                MAX_TAG_LENGTH
            ))));
    }
    Ok(())
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("This field is required.")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(name: &str, email: &str, body: &str) -> CommentForm {
        CommentForm {
            name: name.to_string(),
            email: email.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_comment_form_valid_is_trimmed() {
        let form = comment("  Ada ", "ada@example.com", " Nice post ").clean().unwrap();
        assert_eq!(form.name, "Ada");
        assert_eq!(form.body, "Nice post");
    }

    #[test]
    fn test_comment_form_empty_name_rejected() {
        let errors = comment("", "ada@example.com", "Hi").clean().unwrap_err();
        assert_eq!(
            errors.get("name"),
            Some(&["This field is required.".to_string()][..])
        );
        assert!(!errors.contains("email"));
    }

    #[test]
    fn test_comment_form_whitespace_name_rejected() {
        let errors = comment("   ", "ada@example.com", "Hi").clean().unwrap_err();
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_comment_form_invalid_email() {
        let errors = comment("Ada", "not-an-email", "Hi").clean().unwrap_err();
        assert_eq!(
            errors.get("email"),
            Some(&["Enter a valid email address.".to_string()][..])
        );
    }

    #[test]
    fn test_comment_form_empty_email_reports_required_only() {
        let errors = comment("Ada", "", "Hi").clean().unwrap_err();
        assert_eq!(errors.get("email").map(|m| m.len()), Some(1));
        assert_eq!(errors.get("email").unwrap()[0], "This field is required.");
    }

    #[test]
    fn test_comment_form_name_too_long() {
        let errors = comment(&"x".repeat(81), "ada@example.com", "Hi")
            .clean()
            .unwrap_err();
        assert!(errors.contains("name"));
        assert!(comment(&"x".repeat(80), "ada@example.com", "Hi").clean().is_ok());
    }

    #[test]
    fn test_email_post_form_comments_optional() {
        let form = EmailPostForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            to: "bob@example.com".to_string(),
            comments: String::new(),
        };
        assert!(form.clean().is_ok());
    }

    #[test]
    fn test_email_post_form_name_limit_and_recipient() {
        let form = EmailPostForm {
            name: "x".repeat(26),
            email: "ada@example.com".to_string(),
            to: "nope".to_string(),
            comments: String::new(),
        };
        let errors = form.clean().unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("to"));
        assert!(!errors.contains("email"));
    }

    #[test]
    fn test_post_form_drops_blank_tags() {
        let form = PostForm {
            title: "Title".to_string(),
            body: "Body".to_string(),
            tags: vec![" rust ".to_string(), "".to_string(), "  ".to_string()],
            ..Default::default()
        }
        .clean()
        .unwrap();
        assert_eq!(form.tags, vec!["rust".to_string()]);
    }

    #[test]
    fn test_post_form_tag_length_limit() {
        let form = |tag: String| PostForm {
            title: "Title".to_string(),
            body: "Body".to_string(),
            tags: vec!["rust".to_string(), tag],
            ..Default::default()
        };

        let errors = form("x".repeat(MAX_TAG_LENGTH + 1)).clean().unwrap_err();
        assert_eq!(
            errors.get("tags"),
            Some(&["Ensure each tag has at most 100 characters.".to_string()][..])
        );
        assert!(form("x".repeat(MAX_TAG_LENGTH)).clean().is_ok());
    }
}

use serde::{Deserialize, Serialize};

/// A free-form label attached to posts, addressable by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub slug: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self { name, slug }
    }
}

/// Convert text into a URL-safe slug.
///
/// Lowercases ASCII letters and digits; every other run of characters
/// becomes a single `-`, with no leading or trailing separator.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|ch| match ch {
            'a'..='z' | '0'..='9' => ch,
            _ => '-',
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust & Web  "), "rust-web");
        assert_eq!(slugify("Test_123"), "test-123");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_tag_new_derives_slug() {
        let tag = Tag::new("Machine Learning");
        assert_eq!(tag.name, "Machine Learning");
        assert_eq!(tag.slug, "machine-learning");
    }
}

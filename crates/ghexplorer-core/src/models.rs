use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Anything the search controller can page through.
///
/// The controller only ever looks at the id; everything else is payload
/// for the presentation layer.
pub trait Record: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + fmt::Debug + Send + Sync;

    fn id(&self) -> Self::Id;
}

/// Search text, trimmed on construction so "rust" and "  rust " compare equal
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    pub fn new(text: &str) -> Self {
        Self(text.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository model - the star of the show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: Owner,
    pub description: Option<String>,
    pub url: String,
    pub stars: u32,
    pub forks: u32,
    pub watchers: u32,
    pub open_issues: u32,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    pub avatar_url: String,
}

impl Repository {
    /// Description cut to `max_chars`, or a placeholder when there is none
    pub fn short_description(&self, max_chars: usize) -> String {
        match self.description.as_deref() {
            Some(desc) if !desc.trim().is_empty() => desc.chars().take(max_chars).collect(),
            _ => "No description".to_string(),
        }
    }

    /// Text handed to the clipboard when sharing
    pub fn share_message(&self) -> String {
        format!("Check out this GitHub repository: {}", self.url)
    }
}

impl Record for Repository {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
pub(crate) fn sample_repo(id: u64, name: &str) -> Repository {
    Repository {
        id,
        name: name.to_string(),
        full_name: format!("octo/{}", name),
        owner: Owner {
            login: "octo".to_string(),
            avatar_url: "https://avatars.example/octo".to_string(),
        },
        description: Some(format!("{} does things", name)),
        url: format!("https://github.com/octo/{}", name),
        stars: 42,
        forks: 7,
        watchers: 42,
        open_issues: 1,
        language: Some("Rust".to_string()),
        topics: Vec::new(),
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims_whitespace() {
        assert_eq!(Query::new("  rust  "), Query::new("rust"));
        assert!(Query::new(" \t\n").is_empty());
        assert_eq!(Query::new(" héllo ").char_count(), 5);
    }

    #[test]
    fn test_short_description() {
        let mut repo = sample_repo(1, "tokio");
        repo.description = Some("x".repeat(100));
        assert_eq!(repo.short_description(60).chars().count(), 60);

        repo.description = None;
        assert_eq!(repo.short_description(60), "No description");

        repo.description = Some("   ".to_string());
        assert_eq!(repo.short_description(60), "No description");
    }

    #[test]
    fn test_share_message_uses_url() {
        let repo = sample_repo(1, "tokio");
        assert_eq!(
            repo.share_message(),
            "Check out this GitHub repository: https://github.com/octo/tokio"
        );
    }
}

// Remote catalog client - one HTTP round trip per (query, page)
pub mod github;

pub use github::{CatalogError, GitHubClient, GitHubOwner, GitHubRepo, SearchResponse, DEFAULT_PER_PAGE, DEFAULT_TIMEOUT};

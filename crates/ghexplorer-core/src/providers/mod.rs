// Catalog source implementations
pub mod github;

pub use github::GitHubCatalog;

// GitHub provider implementation - bridges API client with CatalogSource trait
use async_trait::async_trait;
use ghexplorer_api::{CatalogError, GitHubClient, GitHubRepo};

use crate::{
    error::FetchError,
    models::{Owner, Repository},
    search::CatalogSource,
};

/// Wrapper around GitHubClient that implements CatalogSource
pub struct GitHubCatalog {
    client: GitHubClient,
}

impl GitHubCatalog {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogSource for GitHubCatalog {
    type Record = Repository;

    async fn fetch(&self, query: &str, page: u32) -> Result<Vec<Repository>, FetchError> {
        let repos = self.client.search_repositories(query, page).await?;
        Ok(repos.into_iter().map(github_to_repo).collect())
    }
}

impl From<CatalogError> for FetchError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::RateLimitExceeded => FetchError::RateLimited,
            CatalogError::RequestFailed { status, body } => FetchError::ServerError {
                status,
                message: if body.is_empty() {
                    "Unable to fetch data".to_string()
                } else {
                    body
                },
            },
            CatalogError::InvalidPage(page) => FetchError::ServerError {
                status: 400,
                message: format!("invalid page {}", page),
            },
            CatalogError::NetworkError(e) => FetchError::Transport(e.to_string()),
            CatalogError::ParseError(e) => FetchError::ServerError {
                status: 200,
                message: format!("malformed response: {}", e),
            },
        }
    }
}

/// Convert GitHub API repo to our internal Repository model
pub fn github_to_repo(gh: GitHubRepo) -> Repository {
    Repository {
        id: gh.id,
        name: gh.name,
        full_name: gh.full_name,
        owner: Owner {
            login: gh.owner.login,
            avatar_url: gh.owner.avatar_url,
        },
        description: gh.description,
        url: gh.html_url,
        stars: gh.stargazers_count,
        forks: gh.forks_count,
        watchers: gh.watchers_count,
        open_issues: gh.open_issues_count,
        language: gh.language,
        topics: gh.topics,
        updated_at: gh.updated_at,
    }
}

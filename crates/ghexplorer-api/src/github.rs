use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// Page size used by the mobile app this client was modelled on
pub const DEFAULT_PER_PAGE: u32 = 10;

/// A stalled request surfaces as a network error after this long
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum CatalogError {
    /// GitHub answers 403 once the search quota is gone
    #[error("API rate limit exceeded. Try again later.")]
    RateLimitExceeded,

    #[error("Error {status}: Unable to fetch data")]
    RequestFailed { status: u16, body: String },

    #[error("Page numbers start at 1, got {0}")]
    InvalidPage(u32),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Thin client over the repository search endpoint.
///
/// One call is one round trip. Nothing is cached and nothing is retried:
/// a failed page is re-requested only when the user asks again.
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
    per_page: u32,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise or a mock server in tests
    pub fn with_base_url(token: Option<String>, base_url: String) -> Result<Self> {
        Ok(Self {
            client: Self::build_http(DEFAULT_TIMEOUT)?,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
            per_page: DEFAULT_PER_PAGE,
        })
    }

    /// Replace the default request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Self::build_http(timeout)?;
        Ok(self)
    }

    fn build_http(timeout: Duration) -> Result<reqwest::Client> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "ghexplorer/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(client)
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Fetch one page of repository search results.
    ///
    /// `query` must already be trimmed and non-empty; `page` is 1-based.
    pub async fn search_repositories(&self, query: &str, page: u32) -> Result<Vec<GitHubRepo>> {
        if page == 0 {
            return Err(CatalogError::InvalidPage(page));
        }

        let url = format!("{}/search/repositories", self.base_url);
        debug!("GET {} q={:?} page={} per_page={}", url, query, page, self.per_page);

        let mut request = self.client.get(&url).query(&[
            ("q", query),
            ("page", &page.to_string()),
            ("per_page", &self.per_page.to_string()),
        ]);

        if let Some(ref token) = self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(CatalogError::RateLimitExceeded);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let page: SearchResponse = serde_json::from_str(&body)?;
        Ok(page.items)
    }
}

/// Envelope returned by `/search/repositories`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<GitHubRepo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: GitHubOwner,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub watchers_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
    pub avatar_url: String,
}

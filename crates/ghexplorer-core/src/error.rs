use thiserror::Error;

/// Why a catalog fetch failed
///
/// Attached to `SearchStatus::Error`, so it has to be cheap to clone and compare.
/// None of these are retried automatically; the user re-submits or scrolls again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Quota exhausted. Shown with its own message, never auto-retried.
    #[error("API rate limit exceeded. Try again later.")]
    RateLimited,

    /// Network, DNS or timeout failure
    #[error("Network error: {0}")]
    Transport(String),

    /// Any other non-success answer, or a success answer we could not read
    #[error("Error {status}: {message}")]
    ServerError { status: u16, message: String },
}

/// Everything else that can go wrong outside the search path
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Cache operation failed: {0}")]
    CacheError(#[from] ghexplorer_cache::CacheError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

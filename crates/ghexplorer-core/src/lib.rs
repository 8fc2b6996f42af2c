// Core search logic - debounce, pagination and the controller tying them together
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod models;
pub mod pagination;
pub mod preferences;
pub mod providers;
pub mod search;

pub use config::Config;
pub use controller::{EventOutcome, SearchController, SearchOptions};
pub use debounce::Debouncer;
pub use error::{Error, FetchError};
pub use favorites::{FavoriteLookup, Favorites};
pub use models::{Query, Record, Repository};
pub use pagination::{Completion, FetchTicket, Paginator, SearchState, SearchStatus};
pub use preferences::Preferences;
pub use providers::GitHubCatalog;
pub use search::CatalogSource;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;

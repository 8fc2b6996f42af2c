// SQLite-backed key-value store
// Favorites and preferences survive restarts through this

pub mod cache;

pub use cache::{CacheError, CacheManager, Result};

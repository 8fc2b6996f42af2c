use crate::{error::FetchError, models::Record};

/// Where search pages come from - makes testing easier and keeps things flexible
///
/// The controller only needs "give me page N of this query". GitHub implements
/// it for real; tests plug in scripted or mocked sources.
#[cfg_attr(test, mockall::automock(type Record = crate::models::Repository;))]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    type Record: Record;

    /// One round trip for one page. `query` is trimmed and non-empty, `page >= 1`.
    /// An empty vector means the query has no more results.
    async fn fetch(&self, query: &str, page: u32) -> Result<Vec<Self::Record>, FetchError>;
}

//! Pagination state machine for incremental search.
//!
//! Pure and synchronous: every trigger returns the fetch to issue (if any) and
//! every completion is handed back together with the ticket it was issued
//! under. No timers, no I/O; the async driver lives in [`crate::controller`].
//!
//! ```text
//! Idle -> Loading -> Loaded -> LoadingMore -> Loaded -> ...
//!            \                      \
//!             `-> Error <------------'   (left on the next submit / load-more)
//! ```

use tracing::debug;

use crate::{
    error::FetchError,
    models::{Query, Record},
};

/// First page of every fresh search
pub const FIRST_PAGE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// No query yet, or the query was cleared
    Idle,
    /// Page 1 of a fresh query is in flight
    Loading,
    /// Page N+1 is in flight, pages 1..=N stay visible
    LoadingMore,
    Loaded,
    Error(FetchError),
}

/// Snapshot handed to the presentation layer after every transition
#[derive(Debug, Clone)]
pub struct SearchState<R> {
    pub query: Query,
    /// Page number of the most recently requested batch
    pub page: u32,
    /// Records in arrival order, page 1 first
    pub results: Vec<R>,
    pub has_more: bool,
    pub status: SearchStatus,
}

impl<R> SearchState<R> {
    pub fn idle() -> Self {
        Self {
            query: Query::default(),
            page: FIRST_PAGE,
            results: Vec::new(),
            has_more: false,
            status: SearchStatus::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, SearchStatus::Loading | SearchStatus::LoadingMore)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.status {
            SearchStatus::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl<R> Default for SearchState<R> {
    fn default() -> Self {
        Self::idle()
    }
}

/// Tag carried by every outstanding fetch.
///
/// A completion is merged only when its ticket is the live one. The query
/// alone is not enough: re-submitting the same text must also orphan the
/// earlier request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub query: Query,
    pub page: u32,
    seq: u64,
}

/// What happened to a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// Superseded before it arrived; dropped without touching state
    Stale,
}

#[derive(Debug)]
pub struct Paginator<R> {
    state: SearchState<R>,
    in_flight: Option<FetchTicket>,
    // last page merged for the current query; 0 until page 1 lands
    loaded_page: u32,
    next_seq: u64,
}

impl<R: Record> Paginator<R> {
    pub fn new() -> Self {
        Self {
            state: SearchState::idle(),
            in_flight: None,
            loaded_page: 0,
            next_seq: 0,
        }
    }

    pub fn state(&self) -> &SearchState<R> {
        &self.state
    }

    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    /// Debounced text arrived. Acts only if the trimmed text differs from the
    /// current query; an empty query clears everything.
    pub fn query_changed(&mut self, text: &str) -> Option<FetchTicket> {
        let query = Query::new(text);
        if query == self.state.query {
            debug!("query unchanged ({:?}), nothing to do", query.as_str());
            return None;
        }
        self.restart(query)
    }

    /// Explicit submit. Always starts over at page 1, even for the same query,
    /// which is how a failed search gets retried.
    pub fn submit(&mut self, text: &str) -> Option<FetchTicket> {
        self.restart(Query::new(text))
    }

    /// Back to `Idle`. Any in-flight fetch becomes stale.
    /// Returns false when already idle with nothing to drop.
    pub fn clear(&mut self) -> bool {
        let changed = self.state.status != SearchStatus::Idle
            || !self.state.results.is_empty()
            || self.in_flight.is_some();

        self.state = SearchState::idle();
        self.in_flight = None;
        self.loaded_page = 0;
        changed
    }

    /// Next page of the current query, if one may be requested right now.
    ///
    /// Allowed from `Loaded`, and from an `Error` that interrupted a
    /// load-more (so the failed page can be retried). Never while a fetch
    /// is in flight or once the query is exhausted.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.in_flight.is_some() || !self.state.has_more || self.state.query.is_empty() {
            return None;
        }

        let allowed = match self.state.status {
            SearchStatus::Loaded => true,
            SearchStatus::Error(_) => self.loaded_page >= FIRST_PAGE,
            _ => false,
        };
        if !allowed {
            return None;
        }

        let page = self.loaded_page + 1;
        let ticket = self.ticket(self.state.query.clone(), page);
        self.state.page = page;
        self.state.status = SearchStatus::LoadingMore;
        self.in_flight = Some(ticket.clone());

        debug!("load more: {:?} page {}", ticket.query.as_str(), page);
        Some(ticket)
    }

    /// Merge a finished fetch, unless it was superseded.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<R>, FetchError>,
    ) -> Completion {
        if self.in_flight.as_ref() != Some(ticket) {
            debug!(
                "dropping stale response for {:?} page {}",
                ticket.query.as_str(),
                ticket.page
            );
            return Completion::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(records) => {
                debug!(
                    "{:?} page {} -> {} records",
                    ticket.query.as_str(),
                    ticket.page,
                    records.len()
                );
                self.state.has_more = !records.is_empty();
                self.state.results.extend(records);
                self.state.page = ticket.page;
                self.loaded_page = ticket.page;
                self.state.status = SearchStatus::Loaded;
            }
            Err(err) => {
                // earlier pages stay on screen
                self.state.status = SearchStatus::Error(err);
            }
        }

        Completion::Applied
    }

    fn restart(&mut self, query: Query) -> Option<FetchTicket> {
        if query.is_empty() {
            self.clear();
            return None;
        }

        let ticket = self.ticket(query.clone(), FIRST_PAGE);
        self.state = SearchState {
            query,
            page: FIRST_PAGE,
            results: Vec::new(),
            has_more: true,
            status: SearchStatus::Loading,
        };
        self.loaded_page = 0;
        self.in_flight = Some(ticket.clone());

        debug!("fresh search: {:?}", ticket.query.as_str());
        Some(ticket)
    }

    fn ticket(&mut self, query: Query, page: u32) -> FetchTicket {
        self.next_seq += 1;
        FetchTicket {
            query,
            page,
            seq: self.next_seq,
        }
    }
}

impl<R: Record> Default for Paginator<R> {
    fn default() -> Self {
        Self::new()
    }
}

// Search controller - keystrokes in, ordered page merges out
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::{
    debounce::{Debouncer, DEFAULT_QUIET_PERIOD},
    error::FetchError,
    models::Query,
    pagination::{Completion, FetchTicket, Paginator, SearchState},
    search::CatalogSource,
};

/// Knobs for the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Quiet period before typed text turns into a search
    pub debounce: Duration,
    /// Typed text shorter than this (after trimming) is not searched until
    /// submitted explicitly
    pub min_query_chars: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_QUIET_PERIOD,
            min_query_chars: 1,
        }
    }
}

/// Result of applying one queued event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The search state moved; subscribers were notified
    Changed,
    /// Superseded debounce, unchanged query or stale response
    Ignored,
}

enum ControllerEvent<R> {
    DebounceElapsed {
        seq: u64,
        text: String,
    },
    FetchCompleted {
        ticket: FetchTicket,
        result: Result<Vec<R>, FetchError>,
    },
}

/// Drives a [`Paginator`] from user triggers and async completions.
///
/// The owner calls the `on_*` trigger methods and pumps completions with
/// [`next_event`](Self::next_event) or [`drain_events`](Self::drain_events).
/// Fetches run on spawned tasks and report back over a channel, so state is
/// only ever touched from the owner's side.
pub struct SearchController<S: CatalogSource> {
    source: Arc<S>,
    options: SearchOptions,
    paginator: Paginator<S::Record>,
    debouncer: Debouncer,
    // bumped on every schedule/cancel so a timer that fired just before
    // being superseded is recognised and ignored
    debounce_seq: u64,
    text: String,
    events_tx: mpsc::UnboundedSender<ControllerEvent<S::Record>>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent<S::Record>>,
    state_tx: watch::Sender<SearchState<S::Record>>,
}

impl<S> SearchController<S>
where
    S: CatalogSource + 'static,
{
    pub fn new(source: S, options: SearchOptions) -> Self {
        Self::with_source(Arc::new(source), options)
    }

    pub fn with_source(source: Arc<S>, options: SearchOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(SearchState::idle());

        Self {
            source,
            debouncer: Debouncer::new(options.debounce),
            options,
            paginator: Paginator::new(),
            debounce_seq: 0,
            text: String::new(),
            events_tx,
            events_rx,
            state_tx,
        }
    }

    /// Live view of the search state, updated after every transition
    pub fn subscribe(&self) -> watch::Receiver<SearchState<S::Record>> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> &SearchState<S::Record> {
        self.paginator.state()
    }

    /// Search box changed.
    ///
    /// Blank text clears the results right away. Anything else is debounced;
    /// only the last text of a burst is searched.
    pub fn on_query_text_changed(&mut self, text: &str) {
        self.text = text.to_string();
        let query = Query::new(text);

        if query.is_empty() {
            self.cancel_debounce();
            if self.paginator.clear() {
                debug!("query cleared");
                self.publish();
            }
            return;
        }

        if query.char_count() < self.options.min_query_chars {
            // too short to search on its own; don't let an older timer fire either
            self.cancel_debounce();
            return;
        }

        self.debounce_seq += 1;
        let seq = self.debounce_seq;
        let tx = self.events_tx.clone();
        let text = text.to_string();
        self.debouncer.schedule(move || {
            let _ = tx.send(ControllerEvent::DebounceElapsed { seq, text });
        });
    }

    /// "Search now": bypasses the debounce and always restarts at page 1
    pub fn on_explicit_submit(&mut self) {
        self.cancel_debounce();

        let text = self.text.clone();
        if let Some(ticket) = self.paginator.submit(&text) {
            self.issue(ticket);
        }
        self.publish();
    }

    /// Scroll reached the end. Returns true if a page was requested.
    pub fn on_load_more_requested(&mut self) -> bool {
        match self.paginator.load_more() {
            Some(ticket) => {
                self.issue(ticket);
                self.publish();
                true
            }
            None => false,
        }
    }

    /// Wait for the next debounce firing or fetch completion and apply it
    pub async fn next_event(&mut self) -> Option<EventOutcome> {
        let event = self.events_rx.recv().await?;
        Some(self.apply(event))
    }

    /// Apply everything already queued without waiting.
    /// Returns how many events changed the state.
    pub fn drain_events(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply(event) == EventOutcome::Changed {
                changed += 1;
            }
        }
        changed
    }

    fn apply(&mut self, event: ControllerEvent<S::Record>) -> EventOutcome {
        match event {
            ControllerEvent::DebounceElapsed { seq, text } => {
                if seq != self.debounce_seq {
                    debug!("ignoring superseded debounce for {:?}", text);
                    return EventOutcome::Ignored;
                }
                match self.paginator.query_changed(&text) {
                    Some(ticket) => {
                        self.issue(ticket);
                        self.publish();
                        EventOutcome::Changed
                    }
                    None => EventOutcome::Ignored,
                }
            }
            ControllerEvent::FetchCompleted { ticket, result } => {
                if let Err(err) = &result {
                    warn!(
                        "fetch {:?} page {} failed: {}",
                        ticket.query.as_str(),
                        ticket.page,
                        err
                    );
                }
                match self.paginator.complete(&ticket, result) {
                    Completion::Applied => {
                        self.publish();
                        EventOutcome::Changed
                    }
                    Completion::Stale => EventOutcome::Ignored,
                }
            }
        }
    }

    fn issue(&self, ticket: FetchTicket) {
        info!("fetching {:?} page {}", ticket.query.as_str(), ticket.page);

        let source = Arc::clone(&self.source);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch(ticket.query.as_str(), ticket.page).await;
            let _ = tx.send(ControllerEvent::FetchCompleted { ticket, result });
        });
    }

    fn cancel_debounce(&mut self) {
        self.debouncer.cancel();
        self.debounce_seq += 1;
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.paginator.state().clone());
    }
}

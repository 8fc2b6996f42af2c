// TUI application state and event handling
use ghexplorer_core::{
    FavoriteLookup, Favorites, FetchError, Preferences, Repository, SearchState, SearchStatus,
};
use ratatui::widgets::ListState;

use crate::palette::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,    // Navigating results
    Searching, // Typing in search box
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Search,
    Favorites,
}

/// How the status bar should color a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Busy,
    Error,
}

/// What ENTER on the result list does after a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    /// The first page failed, start the search over
    Submit,
    /// A later page failed, ask for it again and keep what is shown
    LoadMore,
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub view: View,
    pub search_input: String,
    /// Latest snapshot published by the search controller
    pub search: SearchState<Repository>,
    pub selected_index: usize,
    pub list_state: ListState,
    pub favorites_index: usize,
    pub favorites_state: ListState,
    /// One-off message (copied link, failed to open browser, ...)
    pub notice: Option<String>,
    pub favorites: Favorites,
    pub preferences: Preferences,
}

impl App {
    pub fn new(favorites: Favorites, preferences: Preferences) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        let mut favorites_state = ListState::default();
        favorites_state.select(Some(0));

        Self {
            should_quit: false,
            input_mode: InputMode::Searching,
            view: View::Search,
            search_input: String::new(),
            search: SearchState::idle(),
            selected_index: 0,
            list_state,
            favorites_index: 0,
            favorites_state,
            notice: None,
            favorites,
            preferences,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn enter_search_mode(&mut self) {
        self.view = View::Search;
        self.input_mode = InputMode::Searching;
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Search => View::Favorites,
            View::Favorites => View::Search,
        };
        self.input_mode = InputMode::Normal;
        self.clamp_favorites_selection();
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.preferences.dark_mode())
    }

    /// Take a new controller snapshot. Selection survives appends and resets
    /// to the top when the result set was replaced.
    pub fn set_search_state(&mut self, state: SearchState<Repository>) {
        let replaced = state.query != self.search.query || state.results.len() < self.search.results.len();
        self.search = state;

        if replaced || self.search.results.is_empty() {
            self.selected_index = 0;
        } else {
            self.selected_index = self.selected_index.min(self.search.results.len() - 1);
        }
        self.list_state.select(Some(self.selected_index));
    }

    pub fn next_result(&mut self) {
        match self.view {
            View::Search => {
                if !self.search.results.is_empty() {
                    self.selected_index = (self.selected_index + 1).min(self.search.results.len() - 1);
                    self.list_state.select(Some(self.selected_index));
                }
            }
            View::Favorites => {
                if !self.favorites.is_empty() {
                    self.favorites_index = (self.favorites_index + 1).min(self.favorites.len() - 1);
                    self.favorites_state.select(Some(self.favorites_index));
                }
            }
        }
    }

    pub fn previous_result(&mut self) {
        match self.view {
            View::Search => {
                self.selected_index = self.selected_index.saturating_sub(1);
                self.list_state.select(Some(self.selected_index));
            }
            View::Favorites => {
                self.favorites_index = self.favorites_index.saturating_sub(1);
                self.favorites_state.select(Some(self.favorites_index));
            }
        }
    }

    /// Selection is within `threshold` rows of the end of the search results
    pub fn near_end(&self, threshold: usize) -> bool {
        self.view == View::Search
            && !self.search.results.is_empty()
            && self.selected_index + threshold >= self.search.results.len() - 1
    }

    pub fn selected_repository(&self) -> Option<&Repository> {
        match self.view {
            View::Search => self.search.results.get(self.selected_index),
            View::Favorites => self.favorites.list().get(self.favorites_index),
        }
    }

    /// Some when the search view is showing a failed fetch
    pub fn retry_action(&self) -> Option<Retry> {
        if self.view != View::Search {
            return None;
        }
        self.search.error()?;

        if self.search.results.is_empty() {
            Some(Retry::Submit)
        } else {
            Some(Retry::LoadMore)
        }
    }

    pub fn is_favorite(&self, repo: &Repository) -> bool {
        self.favorites.is_favorite(repo.id)
    }

    /// Star or unstar whatever is selected
    pub fn toggle_selected_favorite(&mut self) {
        let Some(repo) = self.selected_repository().cloned() else {
            return;
        };

        match self.favorites.toggle(&repo) {
            Ok(true) => self.notice = Some(format!("★ {} added to favorites", repo.full_name)),
            Ok(false) => self.notice = Some(format!("{} removed from favorites", repo.full_name)),
            Err(e) => self.notice = Some(format!("Failed to update favorites: {}", e)),
        }
        self.clamp_favorites_selection();
    }

    /// Remove the selected entry from the favorites view
    pub fn remove_selected_favorite(&mut self) {
        if self.view != View::Favorites {
            return;
        }
        let Some(id) = self.favorites.list().get(self.favorites_index).map(|r| r.id) else {
            return;
        };

        if let Err(e) = self.favorites.remove(id) {
            self.notice = Some(format!("Failed to remove favorite: {}", e));
        }
        self.clamp_favorites_selection();
    }

    pub fn toggle_dark_mode(&mut self) {
        if let Err(e) = self.preferences.toggle_dark_mode() {
            self.notice = Some(format!("Failed to save theme: {}", e));
        }
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Status bar text for the current search state
    pub fn status_line(&self) -> (String, StatusKind) {
        if let Some(notice) = &self.notice {
            return (notice.clone(), StatusKind::Info);
        }

        let count = self.search.results.len();
        match &self.search.status {
            SearchStatus::Idle => (
                "Start typing to search repositories".to_string(),
                StatusKind::Info,
            ),
            SearchStatus::Loading => (
                format!("Searching for \"{}\"...", self.search.query),
                StatusKind::Busy,
            ),
            SearchStatus::LoadingMore => (
                format!("{} results | loading page {}...", count, self.search.page),
                StatusKind::Busy,
            ),
            SearchStatus::Loaded if count == 0 => (
                format!("No repositories match \"{}\"", self.search.query),
                StatusKind::Info,
            ),
            SearchStatus::Loaded if !self.search.has_more => {
                (format!("{} results | end of results", count), StatusKind::Info)
            }
            SearchStatus::Loaded => (format!("{} results", count), StatusKind::Info),
            SearchStatus::Error(err) => (error_message(err), StatusKind::Error),
        }
    }

    fn clamp_favorites_selection(&mut self) {
        self.favorites_index = self
            .favorites_index
            .min(self.favorites.len().saturating_sub(1));
        self.favorites_state.select(Some(self.favorites_index));
    }
}

/// One distinct message per failure kind
pub fn error_message(err: &FetchError) -> String {
    match err {
        FetchError::RateLimited => "API rate limit exceeded. Try again later.".to_string(),
        FetchError::Transport(detail) => {
            format!("Network problem: {} (ENTER to retry)", detail)
        }
        FetchError::ServerError { status, .. } => {
            format!("GitHub returned error {}: unable to fetch data (ENTER to retry)", status)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghexplorer_core::models::Owner;
    use ghexplorer_core::Query;

    fn repo(id: u64) -> Repository {
        Repository {
            id,
            name: format!("repo{}", id),
            full_name: format!("octo/repo{}", id),
            owner: Owner {
                login: "octo".into(),
                avatar_url: String::new(),
            },
            description: None,
            url: format!("https://github.com/octo/repo{}", id),
            stars: 1,
            forks: 0,
            watchers: 0,
            open_issues: 0,
            language: None,
            topics: Vec::new(),
            updated_at: None,
        }
    }

    fn loaded(query: &str, ids: std::ops::Range<u64>, has_more: bool) -> SearchState<Repository> {
        SearchState {
            query: Query::new(query),
            page: 1,
            results: ids.map(repo).collect(),
            has_more,
            status: SearchStatus::Loaded,
        }
    }

    fn app() -> App {
        App::new(Favorites::in_memory(), Preferences::in_memory())
    }

    #[test]
    fn test_selection_kept_on_append_and_reset_on_new_query() {
        let mut app = app();
        app.set_search_state(loaded("abc", 0..10, true));
        for _ in 0..5 {
            app.next_result();
        }
        assert_eq!(app.selected_index, 5);

        app.set_search_state(loaded("abc", 0..20, true));
        assert_eq!(app.selected_index, 5);

        app.set_search_state(loaded("xyz", 0..3, true));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_near_end_threshold() {
        let mut app = app();
        app.set_search_state(loaded("abc", 0..10, true));
        assert!(!app.near_end(3));
        for _ in 0..6 {
            app.next_result();
        }
        assert!(app.near_end(3));
    }

    #[test]
    fn test_toggle_favorite_from_results() {
        let mut app = app();
        app.set_search_state(loaded("abc", 0..3, true));
        app.next_result();

        app.toggle_selected_favorite();
        assert!(app.is_favorite(&repo(1)));
        assert!(!app.is_favorite(&repo(0)));

        app.toggle_selected_favorite();
        assert!(!app.is_favorite(&repo(1)));
    }

    #[test]
    fn test_remove_from_favorites_view() {
        let mut app = app();
        app.set_search_state(loaded("abc", 0..2, true));
        app.toggle_selected_favorite();
        app.next_result();
        app.toggle_selected_favorite();

        app.toggle_view();
        app.next_result();
        app.remove_selected_favorite();
        assert_eq!(app.favorites.len(), 1);
        assert_eq!(app.favorites_index, 0);
        assert_eq!(app.selected_repository().map(|r| r.id), Some(0));
    }

    #[test]
    fn test_status_messages_are_distinct() {
        let mut app = app();
        let mut state = loaded("abc", 0..0, true);

        state.status = SearchStatus::Error(FetchError::RateLimited);
        app.set_search_state(state.clone());
        let (rate, kind) = app.status_line();
        assert_eq!(kind, StatusKind::Error);
        assert_eq!(rate, "API rate limit exceeded. Try again later.");

        state.status = SearchStatus::Error(FetchError::Transport("dns".into()));
        app.set_search_state(state.clone());
        let (transport, _) = app.status_line();
        assert_ne!(rate, transport);

        app.set_search_state(loaded("abc", 0..4, false));
        assert_eq!(app.status_line().0, "4 results | end of results");
    }

    #[test]
    fn test_enter_retries_failed_fetch() {
        let mut app = app();
        app.set_search_state(loaded("abc", 0..10, true));
        assert_eq!(app.retry_action(), None);

        // page 2 failed: keep page 1 and ask for page 2 again
        let mut failed_more = loaded("abc", 0..10, true);
        failed_more.page = 2;
        failed_more.status = SearchStatus::Error(FetchError::Transport("reset".into()));
        app.set_search_state(failed_more);
        assert_eq!(app.retry_action(), Some(Retry::LoadMore));

        // page 1 failed: nothing to keep, start over
        let mut failed_first = loaded("abd", 0..0, true);
        failed_first.status = SearchStatus::Error(FetchError::Transport("reset".into()));
        app.set_search_state(failed_first);
        assert_eq!(app.retry_action(), Some(Retry::Submit));

        app.toggle_view();
        assert_eq!(app.retry_action(), None);
    }
}

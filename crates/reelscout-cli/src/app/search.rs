//! Debounced search input and page selection.
//!
//! Keystrokes only update the pending text. A value is searched once it
//! has been left alone for the debounce window, which the event loop
//! checks by calling [`SearchController::poll`] on every tick.

use std::time::{Duration, Instant};

use reelscout_api::omdb::total_pages;

/// A fetch the controller wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Committed query; empty means no filter.
    pub query: String,
    /// 1-based UI page.
    pub page: u32,
}

/// Debounce and validation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Quiet period before a typed value settles.
    pub debounce: Duration,
    /// Shortest non-empty query that is searched.
    pub min_query_len: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(150),
            min_query_len: 3,
        }
    }
}

impl SearchSettings {
    /// Whether `query` may be searched: blank, or at least
    /// `min_query_len` characters once trimmed.
    #[must_use]
    pub fn accepts(&self, query: &str) -> bool {
        let len = query.trim().chars().count();
        len == 0 || len >= self.min_query_len
    }

    /// Hint for a `query` too short to search.
    #[must_use]
    pub fn short_query_hint(&self, query: &str) -> Option<String> {
        (!self.accepts(query))
            .then(|| format!("Type at least {} characters to search", self.min_query_len))
    }
}

/// Search state machine: raw input, committed query and page.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchController {
    settings: SearchSettings,
    /// Text as typed.
    input: String,
    /// Time of the last unsettled keystroke.
    dirty_since: Option<Instant>,
    /// Last committed (trimmed) query.
    query: String,
    page: u32,
    total_results: u32,
}

impl SearchController {
    /// Creates a controller with an empty committed query on page 1.
    #[must_use]
    pub const fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            input: String::new(),
            dirty_since: None,
            query: String::new(),
            page: 1,
            total_results: 0,
        }
    }

    /// Records a new input value typed at `now`, restarting the debounce window.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.input = text.into();
        self.dirty_since = Some(now);
    }

    /// Settles pending input whose quiet period has elapsed by `now`.
    ///
    /// Returns a page-1 fetch when the settled value is valid and differs
    /// from the committed query.
    pub fn poll(&mut self, now: Instant) -> Option<FetchRequest> {
        let since = self.dirty_since?;
        if now.saturating_duration_since(since) < self.settings.debounce {
            return None;
        }
        self.dirty_since = None;

        let settled = self.input.trim();
        if !self.settings.accepts(settled) {
            tracing::debug!(len = settled.chars().count(), "query too short, not searching");
            return None;
        }
        if settled == self.query {
            return None;
        }

        self.query = String::from(settled);
        self.page = 1;
        tracing::debug!(query = %self.query, "query committed");
        Some(self.current_request())
    }

    /// Empties the input and immediately commits the empty query.
    pub fn clear(&mut self) -> FetchRequest {
        self.input.clear();
        self.dirty_since = None;
        self.query.clear();
        self.page = 1;
        self.current_request()
    }

    /// Moves to `page` if it exists, differs from the current page and no
    /// fetch is in flight.
    pub fn change_page(&mut self, page: u32, loading: bool) -> Option<FetchRequest> {
        if loading || page < 1 || page > self.total_pages() || page == self.page {
            return None;
        }
        self.page = page;
        Some(self.current_request())
    }

    /// Moves to the next page (see [`Self::change_page`]).
    pub fn next_page(&mut self, loading: bool) -> Option<FetchRequest> {
        self.change_page(self.page.saturating_add(1), loading)
    }

    /// Moves to the previous page (see [`Self::change_page`]).
    pub fn prev_page(&mut self, loading: bool) -> Option<FetchRequest> {
        self.change_page(self.page.saturating_sub(1), loading)
    }

    /// Fetch for the committed query and page.
    #[must_use]
    pub fn current_request(&self) -> FetchRequest {
        FetchRequest {
            query: self.query.clone(),
            page: self.page,
        }
    }

    /// Records the total reported by the latest completed fetch.
    pub const fn set_total_results(&mut self, total_results: u32) {
        self.total_results = total_results;
    }

    /// Hint shown while the input is too short to search.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        self.settings.short_query_hint(&self.input)
    }

    /// Text as typed.
    #[must_use]
    pub fn input_text(&self) -> &str {
        &self.input
    }

    /// Committed query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total results of the latest completed fetch.
    #[must_use]
    pub const fn total_results(&self) -> u32 {
        self.total_results
    }

    /// Page count derived from [`Self::total_results`].
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_results)
    }

    /// Whether input is waiting for its quiet period.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.dirty_since.is_some()
    }
}

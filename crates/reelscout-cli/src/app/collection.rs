//! Result collection and per-title details cache.

use std::collections::HashMap;

use reelscout_api::omdb::{MovieDetails, MovieSummary, SearchPage};

use super::search::FetchRequest;

/// Lifecycle of an asynchronous fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Request in flight.
    Loading,
    /// Completed successfully.
    Success(T),
    /// Failed with a user-facing message.
    Error(String),
}

impl<T> FetchStatus<T> {
    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(v) => Some(v),
            _ => None,
        }
    }

    /// The failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Current result page plus the status of the fetch producing it.
///
/// Results shown while a new fetch is loading are those of the previous
/// success. Only the most recently started fetch may write its result.
#[derive(Debug, Default)]
pub struct CollectionStore {
    /// Collection fetch status; the payload lives in `page`.
    status: FetchStatus<()>,
    page: SearchPage,
    latest_seq: u64,
    last_request: Option<FetchRequest>,
}

impl CollectionStore {
    /// Creates an idle, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a fetch for `request` as started and returns its sequence number.
    pub fn begin(&mut self, request: FetchRequest) -> u64 {
        self.latest_seq = self.latest_seq.saturating_add(1);
        self.status = FetchStatus::Loading;
        self.last_request = Some(request);
        self.latest_seq
    }

    /// Applies the outcome of fetch `seq`.
    ///
    /// Returns `false` (and changes nothing) when a newer fetch has started
    /// since. On failure the results are cleared and the total reset to 0.
    pub fn complete(&mut self, seq: u64, result: Result<SearchPage, String>) -> bool {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "dropping stale result page");
            return false;
        }
        match result {
            Ok(page) => {
                self.page = page;
                self.status = FetchStatus::Success(());
            }
            Err(message) => {
                tracing::warn!(%message, "search failed");
                self.page = SearchPage::default();
                self.status = FetchStatus::Error(message);
            }
        }
        true
    }

    /// Fetch status.
    #[must_use]
    pub const fn status(&self) -> &FetchStatus<()> {
        &self.status
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Movies of the current page.
    #[must_use]
    pub fn movies(&self) -> &[MovieSummary] {
        &self.page.items
    }

    /// Total results reported for the current query.
    #[must_use]
    pub const fn total_results(&self) -> u32 {
        self.page.total_results
    }

    /// Featured title: the first movie with a poster, else the first movie.
    #[must_use]
    pub fn featured(&self) -> Option<&MovieSummary> {
        self.page
            .items
            .iter()
            .find(|m| m.poster.is_some())
            .or_else(|| self.page.items.first())
    }

    /// The most recently started request, for retrying.
    #[must_use]
    pub const fn last_request(&self) -> Option<&FetchRequest> {
        self.last_request.as_ref()
    }
}

/// Details fetch status per IMDb id.
#[derive(Debug, Default)]
pub struct DetailsCache {
    entries: HashMap<String, FetchStatus<MovieDetails>>,
}

impl DetailsCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as loading and returns `true` when a fetch should be issued.
    ///
    /// Ids already loaded or loading are left alone; failed ids are retried.
    pub fn request(&mut self, id: &str) -> bool {
        match self.entries.get(id) {
            Some(FetchStatus::Loading | FetchStatus::Success(_)) => false,
            _ => {
                self.entries.insert(String::from(id), FetchStatus::Loading);
                true
            }
        }
    }

    /// Records the outcome of the fetch for `id`.
    pub fn complete(&mut self, id: &str, result: Result<MovieDetails, String>) {
        let status = match result {
            Ok(details) => FetchStatus::Success(details),
            Err(message) => {
                tracing::debug!(id, %message, "details unavailable");
                FetchStatus::Error(message)
            }
        };
        self.entries.insert(String::from(id), status);
    }

    /// Status for `id`; `Idle` when never requested.
    #[must_use]
    pub fn status(&self, id: &str) -> &FetchStatus<MovieDetails> {
        const IDLE: &FetchStatus<MovieDetails> = &FetchStatus::Idle;
        self.entries.get(id).unwrap_or(IDLE)
    }

    /// Loaded details for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MovieDetails> {
        self.entries.get(id).and_then(FetchStatus::value)
    }
}

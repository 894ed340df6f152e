//! Actions fed into [`super::AppState::update`] and the effects it requests.

use std::time::Instant;

use reelscout_api::omdb::{MovieDetails, SearchPage};

use super::search::FetchRequest;

/// Everything that can change application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────
    // User input
    // ─────────────────────────────────────────────────────────
    /// The search box now contains `text`.
    Input {
        /// Full input text.
        text: String,
        /// Keystroke time.
        at: Instant,
    },
    /// Empty the search box and show unfiltered results.
    ClearSearch,
    /// Jump to a page.
    GoToPage(u32),
    /// Next page.
    NextPage,
    /// Previous page.
    PrevPage,
    /// Re-issue the last collection fetch.
    Retry,
    /// The cursor now rests on `id` (or on nothing).
    Focus {
        /// Focused IMDb id.
        id: Option<String>,
        /// Time the cursor arrived.
        at: Instant,
    },

    // ─────────────────────────────────────────────────────────
    // Timers and completions
    // ─────────────────────────────────────────────────────────
    /// Periodic tick driving debounce and dwell timers.
    Tick(Instant),
    /// A collection fetch finished.
    PageLoaded {
        /// Sequence number handed out when the fetch began.
        seq: u64,
        /// Page or user-facing error message.
        result: Result<SearchPage, String>,
    },
    /// A details fetch finished.
    DetailsLoaded {
        /// IMDb id the fetch was issued for.
        id: String,
        /// Details or error message.
        result: Result<MovieDetails, String>,
    },
}

/// Side effects the event loop must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch a UI page and report back with [`Action::PageLoaded`].
    FetchPage {
        /// Sequence number to echo back.
        seq: u64,
        /// What to fetch.
        request: FetchRequest,
    },
    /// Fetch details and report back with [`Action::DetailsLoaded`].
    FetchDetails {
        /// IMDb id.
        id: String,
    },
}

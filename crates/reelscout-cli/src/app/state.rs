//! Application state container.

use std::time::{Duration, Instant};

use super::action::{Action, Effect};
use super::collection::{CollectionStore, DetailsCache};
use super::search::{FetchRequest, SearchController, SearchSettings};

/// How long the cursor must rest on a title before its details are fetched.
pub const DETAILS_DWELL: Duration = Duration::from_millis(300);

/// Title under the cursor and when it got there.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Focus {
    id: String,
    since: Instant,
    /// Whether the dwell already fired for this visit.
    fired: bool,
}

/// Search, results and details state, updated only through [`AppState::update`].
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct AppState {
    /// Search input, committed query and page.
    pub search: SearchController,
    /// Current result page.
    pub collection: CollectionStore,
    /// Details per IMDb id.
    pub details: DetailsCache,
    focus: Option<Focus>,
}

impl AppState {
    /// Creates the initial state.
    #[must_use]
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            search: SearchController::new(settings),
            collection: CollectionStore::new(),
            details: DetailsCache::new(),
            focus: None,
        }
    }

    /// Starts the unfiltered first-page fetch shown on launch.
    pub fn start(&mut self) -> Effect {
        let request = self.search.current_request();
        self.begin_fetch(request)
    }

    /// Applies `action` and returns the fetches to issue.
    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Input { text, at } => {
                self.search.input(text, at);
                Vec::new()
            }
            Action::ClearSearch => {
                let request = self.search.clear();
                vec![self.begin_fetch(request)]
            }
            Action::GoToPage(page) => {
                let loading = self.collection.is_loading();
                let request = self.search.change_page(page, loading);
                self.fetch_if(request)
            }
            Action::NextPage => {
                let loading = self.collection.is_loading();
                let request = self.search.next_page(loading);
                self.fetch_if(request)
            }
            Action::PrevPage => {
                let loading = self.collection.is_loading();
                let request = self.search.prev_page(loading);
                self.fetch_if(request)
            }
            Action::Retry => self.retry(),
            Action::Focus { id, at } => {
                self.set_focus(id, at);
                Vec::new()
            }
            Action::Tick(now) => self.tick(now),
            Action::PageLoaded { seq, result } => {
                if self.collection.complete(seq, result) {
                    self.search
                        .set_total_results(self.collection.total_results());
                }
                Vec::new()
            }
            Action::DetailsLoaded { id, result } => {
                self.details.complete(&id, result);
                Vec::new()
            }
        }
    }

    /// Id of the title under the cursor.
    #[must_use]
    pub fn focused_id(&self) -> Option<&str> {
        self.focus.as_ref().map(|f| f.id.as_str())
    }

    fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Some(request) = self.search.poll(now) {
            effects.push(self.begin_fetch(request));
        }

        if let Some(focus) = self.focus.as_mut()
            && !focus.fired
            && now.saturating_duration_since(focus.since) >= DETAILS_DWELL
        {
            focus.fired = true;
            let id = focus.id.clone();
            if self.details.request(&id) {
                effects.push(Effect::FetchDetails { id });
            }
        }

        effects
    }

    fn retry(&mut self) -> Vec<Effect> {
        if self.collection.status().error().is_none() {
            return Vec::new();
        }
        let Some(request) = self.collection.last_request().cloned() else {
            return Vec::new();
        };
        tracing::info!(query = %request.query, page = request.page, "retrying search");
        vec![self.begin_fetch(request)]
    }

    fn set_focus(&mut self, id: Option<String>, at: Instant) {
        match id {
            Some(id) if self.focused_id() == Some(id.as_str()) => {}
            Some(id) => {
                self.focus = Some(Focus {
                    id,
                    since: at,
                    fired: false,
                });
            }
            None => self.focus = None,
        }
    }

    fn fetch_if(&mut self, request: Option<FetchRequest>) -> Vec<Effect> {
        request.map_or_else(Vec::new, |r| vec![self.begin_fetch(r)])
    }

    fn begin_fetch(&mut self, request: FetchRequest) -> Effect {
        let seq = self.collection.begin(request.clone());
        tracing::debug!(seq, query = %request.query, page = request.page, "fetch started");
        Effect::FetchPage { seq, request }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::arithmetic_side_effects)]
    #![allow(clippy::panic)]

    use reelscout_api::omdb::{MovieDetails, MovieKind, MovieSummary, SearchPage};

    use super::*;
    use crate::app::collection::FetchStatus;

    const DEBOUNCE: Duration = Duration::from_millis(150);

    fn state() -> AppState {
        AppState::new(SearchSettings::default())
    }

    fn movie(id: &str) -> MovieSummary {
        MovieSummary {
            id: String::from(id),
            title: format!("Title {id}"),
            year: String::from("1999"),
            poster: None,
            kind: MovieKind::Movie,
        }
    }

    fn details(id: &str, title: &str) -> MovieDetails {
        MovieDetails {
            summary: MovieSummary {
                title: String::from(title),
                ..movie(id)
            },
            rated: None,
            released: None,
            runtime: Some(String::from("142 min")),
            genres: vec![String::from("Drama")],
            director: None,
            writer: None,
            actors: Vec::new(),
            plot: None,
            language: None,
            country: None,
            awards: None,
            metascore: None,
            imdb_rating: Some(String::from("9.2")),
            imdb_votes: None,
            box_office: None,
        }
    }

    fn page(n: usize, total: u32) -> SearchPage {
        SearchPage {
            items: (0..n).map(|i| movie(&format!("tt{i:07}"))).collect(),
            total_results: total,
        }
    }

    fn fetch_seq(effect: &Effect) -> u64 {
        match effect {
            Effect::FetchPage { seq, .. } => *seq,
            Effect::FetchDetails { .. } => panic!("expected FetchPage, got {effect:?}"),
        }
    }

    /// Starts the app and completes the launch fetch with `total` results.
    fn started(total: u32) -> AppState {
        let mut s = state();
        let seq = fetch_seq(&s.start());
        s.update(Action::PageLoaded {
            seq,
            result: Ok(page(15, total)),
        });
        s
    }

    #[test]
    fn test_start_fetches_unfiltered_first_page() {
        // Arrange
        let mut s = state();

        // Act
        let effect = s.start();

        // Assert
        assert_eq!(
            effect,
            Effect::FetchPage {
                seq: 1,
                request: FetchRequest {
                    query: String::new(),
                    page: 1
                }
            }
        );
        assert!(s.collection.is_loading());
    }

    #[test]
    fn test_typing_then_tick_fires_one_fetch() {
        // Arrange
        let mut s = started(100);
        let t0 = Instant::now();

        // Act
        let on_input = s.update(Action::Input {
            text: String::from("batman"),
            at: t0,
        });
        let early = s.update(Action::Tick(t0 + Duration::from_millis(100)));
        let settled = s.update(Action::Tick(t0 + DEBOUNCE));
        let again = s.update(Action::Tick(t0 + DEBOUNCE * 2));

        // Assert
        assert!(on_input.is_empty());
        assert!(early.is_empty());
        assert_eq!(settled.len(), 1);
        assert!(matches!(
            &settled[0],
            Effect::FetchPage { request, .. } if request.query == "batman" && request.page == 1
        ));
        assert!(again.is_empty());
    }

    #[test]
    fn test_short_query_never_fetches() {
        // Arrange
        let mut s = started(100);
        let t0 = Instant::now();

        // Act
        s.update(Action::Input {
            text: String::from("ba"),
            at: t0,
        });
        let effects = s.update(Action::Tick(t0 + Duration::from_secs(1)));

        // Assert
        assert!(effects.is_empty());
        assert!(s.search.hint().is_some());
    }

    #[test]
    fn test_page_loaded_updates_page_count() {
        // Arrange & Act
        let s = started(47);

        // Assert
        assert_eq!(s.search.total_pages(), 4);
        assert_eq!(s.collection.movies().len(), 15);
    }

    #[test]
    fn test_page_navigation_blocked_while_loading() {
        // Arrange
        let mut s = started(47);
        let first = s.update(Action::NextPage);

        // Act
        let second = s.update(Action::NextPage);

        // Assert
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(s.search.page(), 2);
    }

    #[test]
    fn test_go_to_page_out_of_range_is_noop() {
        // Arrange
        let mut s = started(47);

        // Act
        let effects = s.update(Action::GoToPage(5));

        // Assert
        assert!(effects.is_empty());
        assert_eq!(s.collection.status(), &FetchStatus::Success(()));
    }

    #[test]
    fn test_failed_fetch_clears_results_and_pages() {
        // Arrange
        let mut s = started(47);
        let seq = fetch_seq(&s.update(Action::NextPage)[0]);

        // Act
        s.update(Action::PageLoaded {
            seq,
            result: Err(String::from("HTTP 503")),
        });

        // Assert
        assert!(s.collection.movies().is_empty());
        assert_eq!(s.search.total_pages(), 0);
        assert_eq!(s.collection.status().error(), Some("HTTP 503"));
    }

    #[test]
    fn test_retry_reissues_last_request_after_error() {
        // Arrange
        let mut s = started(47);
        let seq = fetch_seq(&s.update(Action::GoToPage(3))[0]);
        s.update(Action::PageLoaded {
            seq,
            result: Err(String::from("timeout")),
        });

        // Act
        let effects = s.update(Action::Retry);

        // Assert
        assert_eq!(effects.len(), 1);
        assert!(matches!(
            &effects[0],
            Effect::FetchPage { request, .. } if request.page == 3
        ));
    }

    #[test]
    fn test_retry_without_error_is_noop() {
        // Arrange
        let mut s = started(47);

        // Act
        let effects = s.update(Action::Retry);

        // Assert
        assert!(effects.is_empty());
    }

    #[test]
    fn test_new_query_supersedes_in_flight_fetch() {
        // Arrange
        let mut s = started(47);
        let t0 = Instant::now();
        s.update(Action::Input {
            text: String::from("batm"),
            at: t0,
        });
        let old = fetch_seq(&s.update(Action::Tick(t0 + DEBOUNCE))[0]);
        s.update(Action::Input {
            text: String::from("batman"),
            at: t0 + Duration::from_millis(200),
        });
        let new = fetch_seq(&s.update(Action::Tick(t0 + Duration::from_millis(400)))[0]);

        // Act
        s.update(Action::PageLoaded {
            seq: new,
            result: Ok(page(15, 47)),
        });
        s.update(Action::PageLoaded {
            seq: old,
            result: Ok(page(3, 3)),
        });

        // Assert
        assert_eq!(s.collection.movies().len(), 15);
        assert_eq!(s.search.total_results(), 47);
    }

    #[test]
    fn test_clear_search_fetches_immediately() {
        // Arrange
        let mut s = started(47);
        let t0 = Instant::now();
        s.update(Action::Input {
            text: String::from("batman"),
            at: t0,
        });
        s.update(Action::Tick(t0 + DEBOUNCE));

        // Act
        let effects = s.update(Action::ClearSearch);

        // Assert
        assert!(matches!(
            &effects[0],
            Effect::FetchPage { request, .. } if request.query.is_empty() && request.page == 1
        ));
    }

    #[test]
    fn test_details_fetched_after_dwell_only() {
        // Arrange
        let mut s = started(47);
        let t0 = Instant::now();
        s.update(Action::Focus {
            id: Some(String::from("tt0111161")),
            at: t0,
        });

        // Act
        let early = s.update(Action::Tick(t0 + Duration::from_millis(299)));
        let dwelled = s.update(Action::Tick(t0 + DETAILS_DWELL));
        let later = s.update(Action::Tick(t0 + DETAILS_DWELL * 2));

        // Assert
        assert!(early.is_empty());
        assert_eq!(
            dwelled,
            vec![Effect::FetchDetails {
                id: String::from("tt0111161")
            }]
        );
        assert!(later.is_empty());
    }

    #[test]
    fn test_passing_over_a_title_does_not_fetch() {
        // Arrange
        let mut s = started(47);
        let t0 = Instant::now();
        s.update(Action::Focus {
            id: Some(String::from("tt1")),
            at: t0,
        });
        s.update(Action::Focus {
            id: Some(String::from("tt2")),
            at: t0 + Duration::from_millis(100),
        });

        // Act
        let effects = s.update(Action::Tick(t0 + Duration::from_millis(350)));

        // Assert
        assert!(effects.is_empty());
        assert_eq!(s.details.status("tt1"), &FetchStatus::Idle);
    }

    #[test]
    fn test_refocusing_cached_title_does_not_refetch() {
        // Arrange
        let mut s = started(47);
        let t0 = Instant::now();
        s.update(Action::Focus {
            id: Some(String::from("tt0111161")),
            at: t0,
        });
        s.update(Action::Tick(t0 + DETAILS_DWELL));
        s.update(Action::DetailsLoaded {
            id: String::from("tt0111161"),
            result: Ok(details("tt0111161", "The Shawshank Redemption")),
        });
        s.update(Action::Focus { id: None, at: t0 });

        // Act
        let t1 = t0 + Duration::from_secs(1);
        s.update(Action::Focus {
            id: Some(String::from("tt0111161")),
            at: t1,
        });
        let effects = s.update(Action::Tick(t1 + DETAILS_DWELL));

        // Assert
        assert!(effects.is_empty());
    }

    #[test]
    fn test_out_of_order_details_do_not_cross_write() {
        // Arrange
        let mut s = started(47);
        let t0 = Instant::now();
        s.update(Action::Focus {
            id: Some(String::from("tt0111161")),
            at: t0,
        });
        s.update(Action::Tick(t0 + DETAILS_DWELL));
        let t1 = t0 + Duration::from_secs(1);
        s.update(Action::Focus {
            id: Some(String::from("tt0068646")),
            at: t1,
        });
        s.update(Action::Tick(t1 + DETAILS_DWELL));

        // Act: the first request completes last.
        s.update(Action::DetailsLoaded {
            id: String::from("tt0068646"),
            result: Ok(details("tt0068646", "The Godfather")),
        });
        s.update(Action::DetailsLoaded {
            id: String::from("tt0111161"),
            result: Ok(details("tt0111161", "The Shawshank Redemption")),
        });

        // Assert
        assert_eq!(
            s.details.get("tt0111161").unwrap().summary.title,
            "The Shawshank Redemption"
        );
        assert_eq!(
            s.details.get("tt0068646").unwrap().summary.title,
            "The Godfather"
        );
        assert_eq!(s.focused_id(), Some("tt0068646"));
    }

    #[test]
    fn test_details_failure_is_recorded_per_id() {
        // Arrange
        let mut s = started(47);

        // Act
        s.update(Action::DetailsLoaded {
            id: String::from("tt404"),
            result: Err(String::from("Incorrect IMDb ID.")),
        });

        // Assert
        assert_eq!(s.details.status("tt404").error(), Some("Incorrect IMDb ID."));
        assert_eq!(s.collection.status(), &FetchStatus::Success(()));
    }
}

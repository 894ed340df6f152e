//! Browser TUI state: cursor, input mode and active view on top of [`AppState`].

use std::time::Instant;

use reelscout_api::omdb::MovieSummary;
use reelscout_db::FavoritesStore;

use crate::app::{Action, AppState, Effect};

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigation keys.
    Normal,
    /// Typing into the search box.
    Editing,
}

/// Which list the grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Search results.
    Results,
    /// Saved favorites.
    Favorites,
}

/// State for the browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Search, results and details.
    pub app: AppState,
    /// Saved favorites.
    pub favorites: FavoritesStore,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Current view.
    pub view: View,
    /// Grid columns at the last draw.
    pub columns: usize,
    /// One-line feedback shown in the footer.
    pub notice: Option<String>,
    results_cursor: usize,
    favorites_cursor: usize,
}

impl BrowserState {
    /// Creates the browser state.
    #[must_use]
    pub const fn new(app: AppState, favorites: FavoritesStore) -> Self {
        Self {
            app,
            favorites,
            input_mode: InputMode::Normal,
            view: View::Results,
            columns: 1,
            notice: None,
            results_cursor: 0,
            favorites_cursor: 0,
        }
    }

    /// Movies of the active view.
    #[must_use]
    pub fn visible_movies(&self) -> &[MovieSummary] {
        match self.view {
            View::Results => self.app.collection.movies(),
            View::Favorites => self.favorites.list(),
        }
    }

    /// Cursor position in the active view, kept inside the list.
    #[must_use]
    pub fn cursor(&self) -> usize {
        let raw = match self.view {
            View::Results => self.results_cursor,
            View::Favorites => self.favorites_cursor,
        };
        raw.min(self.visible_movies().len().saturating_sub(1))
    }

    /// Movie under the cursor.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&MovieSummary> {
        self.visible_movies().get(self.cursor())
    }

    /// Moves the cursor by `delta` cells, stopping at the list edges.
    pub fn move_by(&mut self, delta: isize) {
        let len = self.visible_movies().len();
        if len == 0 {
            return;
        }
        let next = self
            .cursor()
            .saturating_add_signed(delta)
            .min(len.saturating_sub(1));
        self.set_cursor(next);
    }

    /// Moves one cell left.
    pub fn move_left(&mut self) {
        self.move_by(-1);
    }

    /// Moves one cell right.
    pub fn move_right(&mut self) {
        self.move_by(1);
    }

    /// Moves one row up.
    pub fn move_up(&mut self) {
        let columns = isize::try_from(self.columns.max(1)).unwrap_or(1);
        self.move_by(columns.saturating_neg());
    }

    /// Moves one row down.
    pub fn move_down(&mut self) {
        let columns = isize::try_from(self.columns.max(1)).unwrap_or(1);
        self.move_by(columns);
    }

    /// Switches between results and favorites.
    pub const fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Results => View::Favorites,
            View::Favorites => View::Results,
        };
    }

    /// Toggles the selected movie as a favorite.
    pub fn toggle_favorite(&mut self) {
        let Some(movie) = self.selected_movie().cloned() else {
            return;
        };
        let now_favorite = self.favorites.toggle(&movie);
        tracing::info!(id = %movie.id, now_favorite, "favorite toggled");
        self.notice = Some(if now_favorite {
            format!("Added \"{}\" to favorites", movie.title)
        } else {
            format!("Removed \"{}\" from favorites", movie.title)
        });
    }

    /// Appends `c` to the search input.
    pub fn push_char(&mut self, c: char, now: Instant) -> Vec<Effect> {
        let mut text = String::from(self.app.search.input_text());
        text.push(c);
        self.dispatch(Action::Input { text, at: now })
    }

    /// Removes the last character of the search input.
    pub fn pop_char(&mut self, now: Instant) -> Vec<Effect> {
        let mut text = String::from(self.app.search.input_text());
        if text.pop().is_none() {
            return Vec::new();
        }
        self.dispatch(Action::Input { text, at: now })
    }

    /// Empties the search box unless it and the committed query already are.
    pub fn clear_search(&mut self) -> Vec<Effect> {
        if self.app.search.input_text().is_empty() && self.app.search.query().is_empty() {
            return Vec::new();
        }
        self.dispatch(Action::ClearSearch)
    }

    /// Jumps to result page `digit` (`1`-`9`).
    pub fn jump_to_page(&mut self, digit: char) -> Vec<Effect> {
        match digit.to_digit(10) {
            Some(page) if page > 0 => self.dispatch(Action::GoToPage(page)),
            _ => Vec::new(),
        }
    }

    /// Jumps to the last result page.
    pub fn jump_to_last_page(&mut self) -> Vec<Effect> {
        let last = self.app.search.total_pages();
        self.dispatch(Action::GoToPage(last))
    }

    /// Periodic update: keeps the focus in sync and fires due timers.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let id = self.selected_movie().map(|m| m.id.clone());
        self.app.update(Action::Focus { id, at: now });
        self.dispatch(Action::Tick(now))
    }

    /// Forwards `action` to [`AppState`]; a new result fetch resets the cursor.
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let effects = self.app.update(action);
        if effects
            .iter()
            .any(|e| matches!(e, Effect::FetchPage { .. }))
        {
            self.results_cursor = 0;
        }
        effects
    }

    const fn set_cursor(&mut self, cursor: usize) {
        match self.view {
            View::Results => self.results_cursor = cursor,
            View::Favorites => self.favorites_cursor = cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::arithmetic_side_effects)]

    use std::time::Duration;

    use reelscout_api::omdb::{MovieKind, SearchPage};
    use reelscout_db::MemoryStorage;

    use super::*;
    use crate::app::SearchSettings;

    fn movie(i: usize) -> MovieSummary {
        MovieSummary {
            id: format!("tt{i:07}"),
            title: format!("Movie {i}"),
            year: String::from("2010"),
            poster: None,
            kind: MovieKind::Movie,
        }
    }

    /// Browser with `n` loaded results out of `total`.
    fn browser(n: usize, total: u32) -> BrowserState {
        let mut app = AppState::new(SearchSettings::default());
        let Effect::FetchPage { seq, .. } = app.start() else {
            unreachable!()
        };
        app.update(Action::PageLoaded {
            seq,
            result: Ok(SearchPage {
                items: (0..n).map(movie).collect(),
                total_results: total,
            }),
        });
        BrowserState::new(app, FavoritesStore::load(MemoryStorage::new()))
    }

    #[test]
    fn test_grid_navigation_stays_in_bounds() {
        // Arrange
        let mut s = browser(15, 15);
        s.columns = 4;

        // Act & Assert
        s.move_left();
        assert_eq!(s.cursor(), 0);
        s.move_down();
        assert_eq!(s.cursor(), 4);
        s.move_right();
        assert_eq!(s.cursor(), 5);
        s.move_down();
        s.move_down();
        assert_eq!(s.cursor(), 13);
        s.move_down();
        assert_eq!(s.cursor(), 14);
        s.move_up();
        assert_eq!(s.cursor(), 10);
    }

    #[test]
    fn test_empty_list_has_no_selection() {
        // Arrange
        let mut s = browser(0, 0);

        // Act
        s.move_down();

        // Assert
        assert_eq!(s.selected_movie(), None);
    }

    #[test]
    fn test_toggle_favorite_and_view() {
        // Arrange
        let mut s = browser(5, 5);
        s.move_right();

        // Act
        s.toggle_favorite();
        s.toggle_view();

        // Assert
        assert_eq!(s.view, View::Favorites);
        assert_eq!(s.visible_movies().len(), 1);
        assert_eq!(s.selected_movie().unwrap().id, "tt0000001");
        assert!(s.notice.as_deref().unwrap().starts_with("Added"));
    }

    #[test]
    fn test_toggle_favorite_from_favorites_view_removes_it() {
        // Arrange
        let mut s = browser(5, 5);
        s.toggle_favorite();
        s.toggle_view();

        // Act
        s.toggle_favorite();

        // Assert
        assert!(s.favorites.is_empty());
        assert_eq!(s.selected_movie(), None);
    }

    #[test]
    fn test_typing_debounces_through_tick() {
        // Arrange
        let mut s = browser(15, 47);
        s.columns = 5;
        s.move_down();
        let t0 = Instant::now();

        // Act
        for (i, c) in "alien".chars().enumerate() {
            let at = t0 + Duration::from_millis(30 * u64::try_from(i).unwrap());
            assert!(s.push_char(c, at).is_empty());
            assert!(s.tick(at).is_empty());
        }
        let effects = s.tick(t0 + Duration::from_millis(400));

        // Assert
        assert_eq!(s.app.search.input_text(), "alien");
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::FetchPage { request, .. } if request.query == "alien"
        )));
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_pop_char_on_empty_input_is_noop() {
        // Arrange
        let mut s = browser(1, 1);

        // Act
        let effects = s.pop_char(Instant::now());

        // Assert
        assert!(effects.is_empty());
        assert!(!s.app.search.is_pending());
    }

    #[test]
    fn test_tick_requests_details_for_selection_after_dwell() {
        // Arrange
        let mut s = browser(3, 3);
        let t0 = Instant::now();
        s.tick(t0);

        // Act
        let effects = s.tick(t0 + Duration::from_millis(300));

        // Assert
        assert_eq!(
            effects,
            vec![Effect::FetchDetails {
                id: String::from("tt0000000")
            }]
        );
    }

    #[test]
    fn test_clear_search_when_already_clear_is_noop() {
        // Arrange
        let mut s = browser(15, 47);

        // Act
        let effects = s.clear_search();

        // Assert
        assert!(effects.is_empty());
    }

    #[test]
    fn test_clear_search_after_typing_refetches() {
        // Arrange
        let mut s = browser(15, 47);
        s.push_char('x', Instant::now());

        // Act
        let effects = s.clear_search();

        // Assert
        assert!(matches!(
            effects.as_slice(),
            [Effect::FetchPage { request, .. }] if request.query.is_empty() && request.page == 1
        ));
        assert_eq!(s.app.search.input_text(), "");
    }

    #[test]
    fn test_jump_to_page_digit() {
        // Arrange
        let mut s = browser(15, 47);
        s.move_right();

        // Act
        let effects = s.jump_to_page('3');

        // Assert
        assert!(matches!(
            effects.as_slice(),
            [Effect::FetchPage { request, .. }] if request.page == 3
        ));
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_jump_to_page_out_of_range_or_zero_is_noop() {
        // Arrange
        let mut s = browser(15, 47);

        // Act & Assert
        assert!(s.jump_to_page('0').is_empty());
        assert!(s.jump_to_page('9').is_empty());
        assert!(s.jump_to_page('1').is_empty());
    }

    #[test]
    fn test_jump_to_last_page() {
        // Arrange
        let mut s = browser(15, 47);

        // Act
        let effects = s.jump_to_last_page();

        // Assert
        assert!(matches!(
            effects.as_slice(),
            [Effect::FetchPage { request, .. }] if request.page == 4
        ));
    }
}

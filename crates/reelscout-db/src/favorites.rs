//! Favorite titles as an insertion-ordered set keyed by IMDb id.
//!
//! The whole set is written back on every change as a JSON array under
//! [`FAVORITES_KEY`]. Storage problems never surface to callers: a corrupt
//! or unreadable value loads as an empty set and failed writes are logged.

use reelscout_api::omdb::MovieSummary;

use crate::storage::KeyValueStorage;

/// Storage key holding the favorites JSON array.
pub const FAVORITES_KEY: &str = "movieFavorites";

/// Favorites backed by a [`KeyValueStorage`].
#[allow(clippy::module_name_repetitions)]
pub struct FavoritesStore {
    storage: Box<dyn KeyValueStorage>,
    items: Vec<MovieSummary>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl FavoritesStore {
    /// Loads the persisted favorites from `storage`.
    ///
    /// Missing, unreadable or malformed data yields an empty set.
    #[must_use]
    pub fn load(storage: impl KeyValueStorage + 'static) -> Self {
        let items = match storage.get_item(FAVORITES_KEY) {
            Ok(Some(raw)) => parse_favorites(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = format!("{e:#}"), "failed to read favorites, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(count = items.len(), "favorites loaded");

        Self {
            storage: Box::new(storage),
            items,
        }
    }

    /// Removes `movie` if it is a favorite, otherwise appends it.
    ///
    /// Returns `true` when the movie is a favorite afterwards.
    pub fn toggle(&mut self, movie: &MovieSummary) -> bool {
        let now_favorite = if let Some(pos) = self.position(&movie.id) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(movie.clone());
            true
        };
        self.persist();
        now_favorite
    }

    /// Appends `movie` unless it is already a favorite.
    ///
    /// Returns `true` when the set changed.
    pub fn add(&mut self, movie: &MovieSummary) -> bool {
        if self.is_favorite(&movie.id) {
            return false;
        }
        self.items.push(movie.clone());
        self.persist();
        true
    }

    /// Removes the favorite with `id`.
    ///
    /// Returns `true` when the set changed.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        self.items.remove(pos);
        self.persist();
        true
    }

    /// Returns whether `id` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Favorites in insertion order.
    #[must_use]
    pub fn list(&self) -> &[MovieSummary] {
        &self.items
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|m| m.id == id)
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.items) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize favorites");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(FAVORITES_KEY, &json) {
            tracing::warn!(error = format!("{e:#}"), "failed to persist favorites");
        }
    }
}

/// Parses the stored array, dropping duplicate ids.
fn parse_favorites(raw: &str) -> Vec<MovieSummary> {
    let parsed: Vec<MovieSummary> = match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "stored favorites are corrupt, starting empty");
            return Vec::new();
        }
    };

    let mut items: Vec<MovieSummary> = Vec::with_capacity(parsed.len());
    for movie in parsed {
        if !items.iter().any(|m| m.id == movie.id) {
            items.push(movie);
        }
    }
    items
}

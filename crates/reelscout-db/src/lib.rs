//! Local persistence for reelscout.
//!
//! Uses `rusqlite` (bundled `SQLite`) as a small key/value "local storage"
//! and keeps the user's favorite titles in it as a JSON array.

mod connection;
/// Favorite titles, persisted on every change.
pub mod favorites;
mod migrations;
/// Key/value storage backends.
pub mod storage;

pub use connection::{open_db, resolve_data_dir};
#[allow(clippy::module_name_repetitions)]
pub use favorites::{FAVORITES_KEY, FavoritesStore};
#[allow(clippy::module_name_repetitions)]
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError};

//! Application core: search controller, result and details stores, and
//! the state container tying them together.
//!
//! Nothing here performs I/O. Fetches are returned as [`Effect`]s and
//! their outcomes come back in as [`Action`]s.

mod action;
mod collection;
mod pagination;
mod search;
mod state;

pub use action::{Action, Effect};
pub use collection::FetchStatus;
pub use pagination::{PageItem, page_window};
pub use search::SearchSettings;
pub use state::AppState;

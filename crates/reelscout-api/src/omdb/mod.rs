//! OMDb API client module.
//!
//! Handles HTTP requests to the OMDb endpoint (`?s=` title search and
//! `?i=` lookup by IMDb ID) and composes 15-item UI pages out of the
//! 10-item pages OMDb serves.

mod api;
mod client;
mod error;
mod pager;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{OmdbClient, OmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::OmdbError;
pub use pager::{
    DEFAULT_SEARCH_TERM, EXTERNAL_PAGE_SIZE, EXTERNAL_PAGES_PER_UI_PAGE, UI_PAGE_SIZE,
    external_pages_for, fetch_ui_page, total_pages,
};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    MovieDetails, MovieKind, MovieSummary, NOT_AVAILABLE, OmdbDetailsResponse, OmdbSearchItem,
    OmdbSearchResponse, SearchPage, available,
};

//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{MovieDetails, SearchPage};

/// OMDb API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Searches titles, returning one external (10-item) page.
    ///
    /// A "Movie not found!" answer is an empty page, not an error.
    ///
    /// # Errors
    ///
    /// Returns `OmdbError::NetworkFailure` if the service is unreachable or
    /// answers non-2xx, `OmdbError::Api` for any other OMDb error message,
    /// or `OmdbError::Decode` if the body is not valid JSON.
    async fn search_by_title(&self, query: &str, page: u32) -> Result<SearchPage>;

    /// Fetches the full record for an IMDb ID.
    ///
    /// # Errors
    ///
    /// Returns `OmdbError::NotFound` if OMDb has no such record, or the
    /// same transport/decode errors as `search_by_title`.
    async fn movie_details(&self, id: &str) -> Result<MovieDetails>;
}

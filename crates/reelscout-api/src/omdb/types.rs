//! OMDb wire types and their normalized domain counterparts.
//!
//! OMDb marks every unavailable field with the literal string `"N/A"`.
//! The sentinel is stripped here, at the client boundary, so the rest of
//! the workspace only ever sees `Option` / empty `Vec`.

use serde::{Deserialize, Serialize};

/// The sentinel OMDb uses for "field not available".
pub const NOT_AVAILABLE: &str = "N/A";

/// Error message OMDb returns when a search has no (more) matches.
pub(crate) const MOVIE_NOT_FOUND: &str = "Movie not found!";

// --- Wire: search ---

/// Raw response from `?s=<query>&page=<n>`.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    /// Result items (absent when `Response` is `"False"`).
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchItem>,
    /// Total number of matches, as a decimal string.
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    /// `"True"` or `"False"`.
    #[serde(rename = "Response")]
    pub response: String,
    /// Error message when `Response` is `"False"`.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

/// A single raw search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchItem {
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Year or year range (e.g. `"2008–2013"`).
    #[serde(rename = "Year", default)]
    pub year: String,
    /// IMDb ID.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// `movie`, `series`, `episode` or `game`.
    #[serde(rename = "Type", default)]
    pub kind: String,
    /// Poster URL or `"N/A"`.
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

// --- Wire: details ---

/// Raw response from `?i=<id>&plot=full`.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbDetailsResponse {
    /// `"True"` or `"False"`.
    #[serde(rename = "Response")]
    pub response: String,
    /// Error message when `Response` is `"False"`.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "imdbID", default)]
    pub(crate) imdb_id: Option<String>,
    #[serde(rename = "Title", default)]
    pub(crate) title: Option<String>,
    #[serde(rename = "Year", default)]
    pub(crate) year: Option<String>,
    #[serde(rename = "Type", default)]
    pub(crate) kind: Option<String>,
    #[serde(rename = "Poster", default)]
    pub(crate) poster: Option<String>,
    #[serde(rename = "Rated", default)]
    pub(crate) rated: Option<String>,
    #[serde(rename = "Released", default)]
    pub(crate) released: Option<String>,
    #[serde(rename = "Runtime", default)]
    pub(crate) runtime: Option<String>,
    #[serde(rename = "Genre", default)]
    pub(crate) genre: Option<String>,
    #[serde(rename = "Director", default)]
    pub(crate) director: Option<String>,
    #[serde(rename = "Writer", default)]
    pub(crate) writer: Option<String>,
    #[serde(rename = "Actors", default)]
    pub(crate) actors: Option<String>,
    #[serde(rename = "Plot", default)]
    pub(crate) plot: Option<String>,
    #[serde(rename = "Language", default)]
    pub(crate) language: Option<String>,
    #[serde(rename = "Country", default)]
    pub(crate) country: Option<String>,
    #[serde(rename = "Awards", default)]
    pub(crate) awards: Option<String>,
    #[serde(rename = "Metascore", default)]
    pub(crate) metascore: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub(crate) imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes", default)]
    pub(crate) imdb_votes: Option<String>,
    #[serde(rename = "BoxOffice", default)]
    pub(crate) box_office: Option<String>,
}

impl OmdbSearchResponse {
    /// Whether OMDb reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }

    /// Parses `totalResults`; missing or malformed counts as zero.
    #[must_use]
    pub fn total_results(&self) -> u32 {
        self.total_results
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }
}

impl OmdbDetailsResponse {
    /// Whether OMDb reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

// --- Domain ---

/// Kind of title as reported by OMDb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieKind {
    /// Feature film.
    Movie,
    /// TV series.
    Series,
    /// Single episode.
    Episode,
    /// Video game.
    Game,
    /// Anything OMDb adds later.
    #[serde(other)]
    Other,
}

impl MovieKind {
    /// Maps the raw `Type` value.
    #[must_use]
    pub fn from_omdb(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "movie" => Self::Movie,
            "series" => Self::Series,
            "episode" => Self::Episode,
            "game" => Self::Game,
            _ => Self::Other,
        }
    }

    /// Short display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
            Self::Game => "game",
            Self::Other => "other",
        }
    }
}

/// A search hit, identified by its IMDb ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// IMDb ID (e.g. `tt0111161`).
    pub id: String,
    /// Title.
    pub title: String,
    /// Year or year range.
    pub year: String,
    /// Poster URL, `None` when OMDb has none.
    pub poster: Option<String>,
    /// Title kind.
    pub kind: MovieKind,
}

impl From<OmdbSearchItem> for MovieSummary {
    fn from(item: OmdbSearchItem) -> Self {
        Self {
            id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster: available(item.poster),
            kind: MovieKind::from_omdb(&item.kind),
        }
    }
}

/// Full record for a single title. Every extra field is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDetails {
    /// The summary part (same identity).
    pub summary: MovieSummary,
    /// MPAA-style rating (e.g. `R`).
    pub rated: Option<String>,
    /// Release date as reported.
    pub released: Option<String>,
    /// Runtime as reported (e.g. `142 min`).
    pub runtime: Option<String>,
    /// Genres.
    pub genres: Vec<String>,
    /// Director(s).
    pub director: Option<String>,
    /// Writer(s).
    pub writer: Option<String>,
    /// Main cast.
    pub actors: Vec<String>,
    /// Full plot.
    pub plot: Option<String>,
    /// Spoken languages.
    pub language: Option<String>,
    /// Production countries.
    pub country: Option<String>,
    /// Awards summary.
    pub awards: Option<String>,
    /// Metascore (0-100).
    pub metascore: Option<String>,
    /// IMDb rating (e.g. `9.3`).
    pub imdb_rating: Option<String>,
    /// IMDb vote count.
    pub imdb_votes: Option<String>,
    /// Box office gross.
    pub box_office: Option<String>,
}

impl MovieDetails {
    /// Normalizes a successful details response.
    ///
    /// `fallback_id` is used when the payload omits `imdbID`.
    #[must_use]
    pub fn from_response(raw: OmdbDetailsResponse, fallback_id: &str) -> Self {
        let summary = MovieSummary {
            id: available(raw.imdb_id).unwrap_or_else(|| String::from(fallback_id)),
            title: available(raw.title).unwrap_or_default(),
            year: available(raw.year).unwrap_or_default(),
            poster: available(raw.poster),
            kind: raw
                .kind
                .as_deref()
                .map_or(MovieKind::Other, MovieKind::from_omdb),
        };
        Self {
            summary,
            rated: available(raw.rated),
            released: available(raw.released),
            runtime: available(raw.runtime),
            genres: split_list(raw.genre),
            director: available(raw.director),
            writer: available(raw.writer),
            actors: split_list(raw.actors),
            plot: available(raw.plot),
            language: available(raw.language),
            country: available(raw.country),
            awards: available(raw.awards),
            metascore: available(raw.metascore),
            imdb_rating: available(raw.imdb_rating),
            imdb_votes: available(raw.imdb_votes),
            box_office: available(raw.box_office),
        }
    }

    /// Parsed IMDb rating, if any.
    #[must_use]
    pub fn rating_value(&self) -> Option<f32> {
        self.imdb_rating.as_deref()?.trim().parse().ok()
    }
}

/// One UI page (or one external page) of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// Items in display order.
    pub items: Vec<MovieSummary>,
    /// Total number of matches reported by OMDb.
    pub total_results: u32,
}

/// Drops the `"N/A"` sentinel and blank strings.
#[must_use]
pub fn available(raw: Option<String>) -> Option<String> {
    raw.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
            None
        } else if trimmed.len() == value.len() {
            Some(value)
        } else {
            Some(String::from(trimmed))
        }
    })
}

/// Splits a comma-separated OMDb list, honoring the sentinel.
fn split_list(raw: Option<String>) -> Vec<String> {
    available(raw).map_or_else(Vec::new, |value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    })
}

//! UI-page composition on top of OMDb's fixed 10-item pages.
//!
//! The UI shows 15 items per page while OMDb serves 10, so one UI page is
//! built from three consecutive external pages, concatenated and cut at 15.
//! This silently assumes OMDb keeps serving exactly `EXTERNAL_PAGE_SIZE`
//! items per page; if that changes, pages will overlap or skip items.

use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use tracing::instrument;

use super::api::LocalOmdbApi;
use super::types::SearchPage;

/// Items per UI page.
pub const UI_PAGE_SIZE: usize = 15;

/// Items per OMDb page.
pub const EXTERNAL_PAGE_SIZE: usize = 10;

/// External requests issued per UI page.
pub const EXTERNAL_PAGES_PER_UI_PAGE: u32 = 3;

/// Term searched when the user has not typed a filter.
pub const DEFAULT_SEARCH_TERM: &str = "movie";

/// Queries containing this term short-circuit to an empty page.
const SUPPRESSED_TERM: &str = "avengers";

/// External pages backing a UI page (`ui_page` is 1-based; 0 is treated as 1).
#[must_use]
pub fn external_pages_for(ui_page: u32) -> RangeInclusive<u32> {
    let first = ui_page
        .max(1)
        .saturating_sub(1)
        .saturating_mul(EXTERNAL_PAGES_PER_UI_PAGE)
        .saturating_add(1);
    first..=first.saturating_add(EXTERNAL_PAGES_PER_UI_PAGE.saturating_sub(1))
}

/// Number of UI pages needed for `total_results` items.
#[must_use]
pub fn total_pages(total_results: u32) -> u32 {
    #[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
    let page_size = UI_PAGE_SIZE as u32;
    total_results.div_ceil(page_size)
}

/// Fetches one UI page for `query`.
///
/// - A blank query searches `DEFAULT_SEARCH_TERM`.
/// - A query mentioning "avengers" yields an empty page without any request.
/// - Otherwise the three external pages are requested in order; if any of
///   them fails the whole page fails and nothing partial is returned.
///
/// `total_results` is taken from the first external page.
///
/// # Errors
///
/// Returns the first sub-request error, with the failing external page
/// number as context.
#[instrument(skip(api))]
pub async fn fetch_ui_page(
    api: &(impl LocalOmdbApi + Sync),
    query: &str,
    ui_page: u32,
) -> Result<SearchPage> {
    let trimmed = query.trim();
    let term = if trimmed.is_empty() {
        DEFAULT_SEARCH_TERM
    } else {
        trimmed
    };

    if term.to_lowercase().contains(SUPPRESSED_TERM) {
        tracing::info!(term, "query is suppressed, returning no results");
        return Ok(SearchPage::default());
    }

    let mut items =
        Vec::with_capacity(EXTERNAL_PAGE_SIZE.saturating_mul(EXTERNAL_PAGES_PER_UI_PAGE as usize));
    let mut total_results: Option<u32> = None;

    for external_page in external_pages_for(ui_page) {
        let page = api
            .search_by_title(term, external_page)
            .await
            .with_context(|| format!("search for {term:?} failed on external page {external_page}"))?;

        if total_results.is_none() {
            total_results = Some(page.total_results);
        }
        items.extend(page.items);
    }

    items.truncate(UI_PAGE_SIZE);

    let total_results = total_results.unwrap_or(0);
    tracing::info!(
        term,
        ui_page,
        items = items.len(),
        total_results,
        "UI page composed"
    );

    Ok(SearchPage {
        items,
        total_results,
    })
}

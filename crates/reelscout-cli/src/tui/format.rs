//! Display formatting for movie fields.

use std::sync::LazyLock;

use ratatui::style::Color;
use regex::Regex;

/// Leading minute count of an OMDb runtime such as `142 min`.
#[allow(clippy::expect_used)]
static RUNTIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)").expect("failed to compile runtime regex"));

/// Rating at which a title counts as top rated.
pub const TOP_RATED_THRESHOLD: f32 = 8.0;

/// Formats an OMDb runtime as `2h 22m` (or `45m` under an hour).
///
/// Values without a number are returned unchanged.
#[must_use]
pub fn format_runtime(runtime: &str) -> String {
    let minutes = RUNTIME_RE
        .captures(runtime)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    match minutes {
        Some(total) if total >= 60 => format!("{}h {}m", total / 60, total % 60),
        Some(total) => format!("{total}m"),
        None => String::from(runtime),
    }
}

/// Colour for an IMDb rating: green from 8, yellow from 6, red below.
#[must_use]
pub fn rating_color(rating: f32) -> Color {
    if rating >= TOP_RATED_THRESHOLD {
        Color::Green
    } else if rating >= 6.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Formats a number with thousands separators (e.g. 169940 -> "169,940").
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub fn fmt_num(n: u32) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// IMDb page for a title.
#[must_use]
pub fn imdb_url(id: &str) -> String {
    format!("https://www.imdb.com/title/{id}/")
}

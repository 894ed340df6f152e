//! TUI rendering logic for the browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use reelscout_api::omdb::{MovieDetails, MovieSummary};

use super::format::{TOP_RATED_THRESHOLD, fmt_num, format_runtime, rating_color};
use super::state::{BrowserState, InputMode, View};
use crate::app::{FetchStatus, PageItem, page_window};

/// Grid card width including borders.
const CARD_WIDTH: u16 = 26;

/// Grid card height including borders.
const CARD_HEIGHT: u16 = 4;

/// Favorite marker.
const FAVORITE_MARK: &str = "\u{2605}";

/// Draws the browser UI. Returns the number of grid columns.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &BrowserState) -> usize {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search
            Constraint::Length(6), // hero
            Constraint::Min(8),    // grid + details
            Constraint::Length(1), // pagination
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_hero(frame, chunks[1], state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[2]);

    let columns = draw_grid(frame, body[0], state);
    draw_details(frame, body[1], state);
    draw_pagination(frame, chunks[3], state);
    draw_footer(frame, chunks[4], state);

    columns
}

/// Draws the search box and result summary.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    let input_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let mut spans = vec![Span::styled(state.app.search.input_text(), input_style)];
    if editing {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    if let Some(hint) = state.app.search.hint() {
        spans.push(Span::styled(
            format!("  {hint}"),
            Style::default().fg(Color::DarkGray),
        ));
    } else if state.app.search.is_pending() {
        spans.push(Span::styled("  ...", Style::default().fg(Color::DarkGray)));
    }
    let search = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, header_chunks[0]);

    let summary = match state.view {
        View::Favorites => format!("{} favorites", state.favorites.len()),
        View::Results if state.app.collection.is_loading() => String::from("Loading..."),
        View::Results => {
            let search = &state.app.search;
            format!(
                "{} results  page {}/{}",
                fmt_num(search.total_results()),
                search.page(),
                search.total_pages().max(1)
            )
        }
    };
    let title = match state.app.search.query() {
        "" => String::from(" Popular "),
        q => format!(" \"{q}\" "),
    };
    let summary = Paragraph::new(summary).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(summary, header_chunks[1]);
}

/// Draws the featured title.
fn draw_hero(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Featured ")
        .border_style(Style::default().fg(Color::Magenta));

    let Some(movie) = state.app.collection.featured() else {
        let text = if state.app.collection.is_loading() {
            "Loading featured content..."
        } else {
            "Nothing to feature"
        };
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    };

    let details = state.app.details.get(&movie.id);
    let mut lines = vec![Line::from(vec![
        Span::styled(
            movie.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {}  {}", movie.year, movie.kind.label())),
    ])];
    if let Some(d) = details {
        lines.push(rating_line(d));
        if let Some(plot) = &d.plot {
            lines.push(Line::from(plot.clone()));
        }
    }

    let hero = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(hero, area);
}

/// Draws the results (or favorites) grid. Returns the column count.
#[allow(clippy::arithmetic_side_effects)]
fn draw_grid(frame: &mut Frame, area: Rect, state: &BrowserState) -> usize {
    let title = match state.view {
        View::Results => " Results ",
        View::Favorites => " Favorites ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = usize::from((inner.width / CARD_WIDTH).max(1));

    if state.view == View::Results
        && let Some(message) = state.app.collection.status().error()
    {
        let banner = Paragraph::new(vec![
            Line::styled(
                "Something went wrong",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Line::from(message.to_owned()),
            Line::from("Press r to retry"),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(banner, inner);
        return columns;
    }

    let movies = state.visible_movies();
    if movies.is_empty() {
        let text = match state.view {
            View::Results if state.app.collection.is_loading() => "Loading...",
            View::Results => "No results",
            View::Favorites => "No favorites yet. Press f on a title to add it.",
        };
        frame.render_widget(Paragraph::new(text), inner);
        return columns;
    }

    let cursor = state.cursor();
    let visible_rows = usize::from((inner.height / CARD_HEIGHT).max(1));
    let cursor_row = cursor / columns;
    let first_row = cursor_row.saturating_sub(visible_rows - 1);

    for (idx, movie) in movies.iter().enumerate().skip(first_row * columns) {
        let row = idx / columns - first_row;
        if row >= visible_rows {
            break;
        }
        let col = idx % columns;
        let (Ok(x_off), Ok(y_off)) = (u16::try_from(col), u16::try_from(row)) else {
            break;
        };
        let cell = Rect {
            x: inner.x + x_off * CARD_WIDTH,
            y: inner.y + y_off * CARD_HEIGHT,
            width: CARD_WIDTH.min(inner.width),
            height: CARD_HEIGHT,
        };
        draw_card(
            frame,
            cell,
            movie,
            idx == cursor,
            state.favorites.is_favorite(&movie.id),
        );
    }

    columns
}

/// Draws one result card.
fn draw_card(frame: &mut Frame, area: Rect, movie: &MovieSummary, selected: bool, favorite: bool) {
    let border_style = if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut title_spans = Vec::new();
    if favorite {
        title_spans.push(Span::styled(
            format!("{FAVORITE_MARK} "),
            Style::default().fg(Color::Red),
        ));
    }
    title_spans.push(Span::styled(
        movie.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ));

    let card = Paragraph::new(vec![
        Line::from(title_spans),
        Line::styled(
            format!("{}  {}", movie.year, movie.kind.label()),
            Style::default().fg(Color::Gray),
        ),
    ])
    .block(Block::default().borders(Borders::ALL).border_style(border_style));
    frame.render_widget(card, area);
}

/// Draws the details panel for the selected title.
fn draw_details(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");

    let Some(movie) = state.selected_movie() else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let mut lines = vec![
        Line::styled(
            movie.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(format!("{}  {}  {}", movie.year, movie.kind.label(), movie.id)),
    ];
    if state.favorites.is_favorite(&movie.id) {
        lines.push(Line::styled(
            format!("{FAVORITE_MARK} Favorite"),
            Style::default().fg(Color::Red),
        ));
    }
    lines.push(Line::from(""));

    match state.app.details.status(&movie.id) {
        FetchStatus::Success(d) => lines.extend(details_lines(d)),
        FetchStatus::Loading => lines.push(Line::styled(
            "Loading details...",
            Style::default().fg(Color::DarkGray),
        )),
        FetchStatus::Idle | FetchStatus::Error(_) => {}
    }

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(details, area);
}

/// Rating, runtime and genre line.
fn rating_line(d: &MovieDetails) -> Line<'static> {
    let mut spans = Vec::new();
    if let Some(rating) = d.rating_value() {
        spans.push(Span::styled(
            format!("{FAVORITE_MARK} {rating:.1}"),
            Style::default().fg(rating_color(rating)),
        ));
        if rating >= TOP_RATED_THRESHOLD {
            spans.push(Span::styled(
                " TOP RATED",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }
    }
    if let Some(runtime) = &d.runtime {
        spans.push(Span::raw(format!("  {}", format_runtime(runtime))));
    }
    if let Some(rated) = &d.rated {
        spans.push(Span::raw(format!("  {rated}")));
    }
    if !d.genres.is_empty() {
        spans.push(Span::styled(
            format!("  {}", d.genres.join(", ")),
            Style::default().fg(Color::Gray),
        ));
    }
    Line::from(spans)
}

/// Full details body.
fn details_lines(d: &MovieDetails) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Yellow);
    let mut lines = vec![rating_line(d)];

    let mut field = |name: &'static str, value: Option<String>| {
        if let Some(v) = value {
            lines.push(Line::from(vec![
                Span::styled(format!("{name}: "), label),
                Span::raw(v),
            ]));
        }
    };
    field("Director", d.director.clone());
    field("Writer", d.writer.clone());
    field(
        "Cast",
        (!d.actors.is_empty()).then(|| d.actors.join(", ")),
    );
    field("Released", d.released.clone());
    field("Language", d.language.clone());
    field("Country", d.country.clone());
    field("Awards", d.awards.clone());
    field("Box office", d.box_office.clone());
    field("Votes", d.imdb_votes.clone());
    field("Metascore", d.metascore.clone());

    if let Some(plot) = &d.plot {
        lines.push(Line::from(""));
        lines.push(Line::from(plot.clone()));
    }
    lines
}

/// Draws the pagination bar.
fn draw_pagination(frame: &mut Frame, area: Rect, state: &BrowserState) {
    if state.view != View::Results {
        return;
    }
    let search = &state.app.search;
    let items = page_window(search.page(), search.total_pages());
    if items.is_empty() {
        return;
    }

    let mut spans = vec![Span::raw(" \u{2039} ")];
    for item in items {
        match item {
            PageItem::Page(n) if n == search.page() => spans.push(Span::styled(
                format!(" {n} "),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            PageItem::Page(n) => spans.push(Span::raw(format!(" {n} "))),
            PageItem::Ellipsis => spans.push(Span::styled(
                " ... ",
                Style::default().fg(Color::DarkGray),
            )),
        }
    }
    spans.push(Span::raw(" \u{203a} "));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draws the footer with key hints or the latest notice.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help_text = match state.input_mode {
        InputMode::Editing => Line::from("Type to search | Enter: done | Esc: clear"),
        InputMode::Normal => Line::from(vec![Span::raw(
            "/: search  \u{2190}\u{2191}\u{2193}\u{2192}/hjkl: move  n/p/1-9/G: page  f: favorite  o: open  r: retry  Tab: favorites  q: quit",
        )]),
    };

    let mut block = Block::default().borders(Borders::ALL);
    if let Some(notice) = &state.notice {
        block = block.title(format!(" {notice} "));
    }
    let footer = Paragraph::new(help_text).block(block);
    frame.render_widget(footer, area);
}

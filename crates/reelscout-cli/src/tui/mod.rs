//! Interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. Fetches run as local tasks
//! on the current-thread runtime and report back over an `mpsc` channel.

mod format;
/// Browser state types.
pub mod state;
mod ui;

use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use reelscout_api::omdb::{LocalOmdbApi, fetch_ui_page};
use reelscout_db::FavoritesStore;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use self::state::{BrowserState, InputMode};
use crate::app::{Action, AppState, Effect, SearchSettings};

pub use format::{format_runtime, imdb_url};

/// Event loop period; also the resolution of the debounce and dwell timers.
const TICK: Duration = Duration::from_millis(25);

/// Runs the browser until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A>(api: A, favorites: FavoritesStore, settings: SearchSettings) -> Result<()>
where
    A: LocalOmdbApi + Sync + 'static,
{
    let mut state = BrowserState::new(AppState::new(settings), favorites);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let local = tokio::task::LocalSet::new();
    let result = local
        .run_until(run_event_loop(&mut terminal, &mut state, Rc::new(api)))
        .await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    api: Rc<A>,
) -> Result<()>
where
    A: LocalOmdbApi + Sync + 'static,
{
    let (tx, mut rx) = unbounded_channel::<Action>();

    let first = state.app.start();
    spawn_effects(&api, &tx, vec![first]);

    loop {
        drain_completions(state, &mut rx);

        let effects = state.tick(Instant::now());
        spawn_effects(&api, &tx, effects);

        terminal
            .draw(|frame| {
                state.columns = ui::draw(frame, state);
            })
            .context("failed to draw TUI")?;

        while event::poll(Duration::ZERO).context("failed to poll events")? {
            let Event::Key(key) = event::read().context("failed to read event")? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let now = Instant::now();
            let (effects, quit) = match state.input_mode {
                InputMode::Editing => (handle_editing_input(state, key.code, now), false),
                InputMode::Normal => handle_normal_input(state, key.code, key.modifiers),
            };
            spawn_effects(&api, &tx, effects);
            if quit {
                return Ok(());
            }
        }

        tokio::time::sleep(TICK).await;
    }
}

/// Applies every completed fetch waiting on the channel.
fn drain_completions(state: &mut BrowserState, rx: &mut UnboundedReceiver<Action>) {
    while let Ok(action) = rx.try_recv() {
        state.dispatch(action);
    }
}

/// Starts a local task per effect; each sends its outcome back on `tx`.
fn spawn_effects<A>(api: &Rc<A>, tx: &UnboundedSender<Action>, effects: Vec<Effect>)
where
    A: LocalOmdbApi + Sync + 'static,
{
    for effect in effects {
        let api = Rc::clone(api);
        let tx = tx.clone();
        match effect {
            Effect::FetchPage { seq, request } => {
                tokio::task::spawn_local(async move {
                    let result = fetch_ui_page(api.as_ref(), &request.query, request.page)
                        .await
                        .map_err(|e| {
                            tracing::warn!(error = format!("{e:#}"), "page fetch failed");
                            format!("{e:#}")
                        });
                    let _ = tx.send(Action::PageLoaded { seq, result });
                });
            }
            Effect::FetchDetails { id } => {
                tokio::task::spawn_local(async move {
                    let result = api
                        .movie_details(&id)
                        .await
                        .map_err(|e| format!("{e:#}"));
                    let _ = tx.send(Action::DetailsLoaded { id, result });
                });
            }
        }
    }
}

/// Handles key input while editing the search box.
fn handle_editing_input(state: &mut BrowserState, key: KeyCode, now: Instant) -> Vec<Effect> {
    match key {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.clear_search()
        }
        KeyCode::Enter | KeyCode::Down => {
            state.input_mode = InputMode::Normal;
            Vec::new()
        }
        KeyCode::Backspace => state.pop_char(now),
        KeyCode::Char(c) => state.push_char(c, now),
        _ => Vec::new(),
    }
}

/// Handles key input in normal mode. Returns the effects and whether to exit.
fn handle_normal_input(
    state: &mut BrowserState,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> (Vec<Effect>, bool) {
    state.notice = None;
    let effects = match key {
        KeyCode::Char('q') => return (Vec::new(), true),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return (Vec::new(), true);
        }
        KeyCode::Char('/') => {
            state.input_mode = InputMode::Editing;
            Vec::new()
        }
        KeyCode::Esc => state.clear_search(),
        KeyCode::Left | KeyCode::Char('h') => {
            state.move_left();
            Vec::new()
        }
        KeyCode::Right | KeyCode::Char('l') => {
            state.move_right();
            Vec::new()
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.move_up();
            Vec::new()
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.move_down();
            Vec::new()
        }
        KeyCode::Char('n') | KeyCode::PageDown => state.dispatch(Action::NextPage),
        KeyCode::Char('p') | KeyCode::PageUp => state.dispatch(Action::PrevPage),
        KeyCode::Char(c @ '1'..='9') => state.jump_to_page(c),
        KeyCode::Char('G') => state.jump_to_last_page(),
        KeyCode::Char('r') => state.dispatch(Action::Retry),
        KeyCode::Char('f') => {
            state.toggle_favorite();
            Vec::new()
        }
        KeyCode::Char('o') => {
            open_imdb_page(state);
            Vec::new()
        }
        KeyCode::Tab => {
            state.toggle_view();
            Vec::new()
        }
        _ => Vec::new(),
    };
    (effects, false)
}

/// Opens the IMDb page for the selected title.
fn open_imdb_page(state: &mut BrowserState) {
    let Some(movie) = state.selected_movie() else {
        return;
    };
    let url = imdb_url(&movie.id);
    if let Err(e) = open::that(&url) {
        tracing::warn!(%url, error = %e, "failed to open browser");
        state.notice = Some(format!("Could not open {url}"));
    }
}

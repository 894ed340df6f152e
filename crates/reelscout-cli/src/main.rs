//! reelscout - movie discovery over the OMDb API.

/// Search controller, result stores and application state.
mod app;
/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::app::SearchSettings;
use crate::config::{API_KEY_ENV, AppConfig, SearchConfig, resolve_config_path};
use crate::tui::{format_runtime, imdb_url, run_browser};
use reelscout_api::omdb::{LocalOmdbApi, OmdbClient, OmdbError, fetch_ui_page, total_pages};
use reelscout_db::{FavoritesStore, SqliteStorage, open_db, resolve_data_dir};

/// Log file used while the TUI owns the terminal.
const BROWSE_LOG_FILE: &str = "reelscout.log";

/// Per-request timeout for OMDb calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search titles and print one page of results.
    Search(SearchArgs),
    /// Show the full record of a title.
    Details(DetailsArgs),
    /// Manage saved favorites.
    Favorites(FavoritesCommand),
    /// Browse, search and favorite titles interactively.
    Browse,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Title to search for (default: popular titles).
    #[arg(long, default_value = "")]
    query: String,

    /// Result page, 15 titles per page.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// IMDb ID (e.g. "tt0111161").
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `favorites` subcommand.
#[derive(clap::Args)]
struct FavoritesCommand {
    /// Favorites subcommand to run.
    #[command(subcommand)]
    command: FavoritesSubcommands,
}

/// Available favorites subcommands.
#[derive(Subcommand)]
enum FavoritesSubcommands {
    /// List saved favorites.
    List,
    /// Add a title to favorites.
    Add(FavoriteIdArgs),
    /// Remove a title from favorites.
    Remove(FavoriteIdArgs),
    /// Add the title if absent, remove it otherwise.
    Toggle(FavoriteIdArgs),
}

/// Arguments naming one title.
#[derive(clap::Args)]
struct FavoriteIdArgs {
    /// IMDb ID (e.g. "tt0111161").
    #[arg(long, required = true)]
    id: String,
}

/// Builds an `OmdbClient` from config and the `OMDB_API_KEY` environment variable.
///
/// # Errors
///
/// Returns an error if no API key is available, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_omdb_client(config: &AppConfig) -> Result<OmdbClient> {
    let Some(api_key) = config.resolve_api_key(std::env::var(API_KEY_ENV).ok()) else {
        bail!("{API_KEY_ENV} environment variable is required (or set omdb.api_key in config.toml)");
    };
    let base_url = Url::parse(&config.omdb.base_url)
        .with_context(|| format!("invalid omdb.base_url {:?}", config.omdb.base_url))?;

    OmdbClient::builder()
        .base_url(base_url)
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .min_interval(config.omdb.min_interval())
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("failed to build OMDb client")
}

/// Loads `config.toml` from `--dir` or the default location.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Opens the favorites store in the local database.
fn open_favorites(dir: Option<&PathBuf>) -> Result<FavoritesStore> {
    let conn = open_db(dir).context("failed to open database")?;
    Ok(FavoritesStore::load(SqliteStorage::new(conn)))
}

/// Converts the search section of the config.
const fn search_settings(search: &SearchConfig) -> SearchSettings {
    SearchSettings {
        debounce: search.debounce(),
        min_query_len: search.min_query_len,
    }
}

/// Fails when `page` lies past the last page of `total_results`.
///
/// Page 1 is always in range so an empty result still prints.
fn ensure_page_in_range(page: u32, total_results: u32) -> Result<()> {
    let last = total_pages(total_results).max(1);
    if page > last {
        bail!("page {page} is out of range (last page is {last})");
    }
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the query is too short to search, the page is
/// past the last one, the client fails to build, or any request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    if let Some(hint) = search_settings(&config.search).short_query_hint(&args.query) {
        bail!("{hint}");
    }
    let client = build_omdb_client(&config)?;

    let page = fetch_ui_page(&client, &args.query, args.page)
        .await
        .context("search failed")?;
    ensure_page_in_range(args.page, page.total_results)?;

    tracing::info!("IMDb ID\t\tYear\t\tType\tTitle");
    for movie in &page.items {
        tracing::info!(
            "{}\t{}\t\t{}\t{}",
            movie.id,
            movie.year,
            movie.kind.label(),
            movie.title,
        );
    }
    tracing::info!(
        "Total: {} results, page {}/{}",
        page.total_results,
        args.page,
        total_pages(page.total_results)
    );

    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build, the title does not
/// exist, or the request fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_omdb_client(&config)?;

    let details = match client.movie_details(&args.id).await {
        Ok(details) => details,
        Err(e) if OmdbError::find(&e).is_some_and(OmdbError::is_not_found) => {
            bail!("no title with IMDb ID {}", args.id);
        }
        Err(e) => return Err(e.context("details request failed")),
    };

    let favorites = open_favorites(dir)?;
    let dash = || String::from("-");

    tracing::info!("{} ({})", details.summary.title, details.summary.year);
    tracing::info!("ID: {}", details.summary.id);
    tracing::info!("Type: {}", details.summary.kind.label());
    tracing::info!(
        "Rating: {}",
        details.imdb_rating.clone().unwrap_or_else(dash)
    );
    tracing::info!(
        "Runtime: {}",
        details
            .runtime
            .as_deref()
            .map_or_else(dash, format_runtime)
    );
    tracing::info!("Rated: {}", details.rated.clone().unwrap_or_else(dash));
    tracing::info!("Released: {}", details.released.clone().unwrap_or_else(dash));
    tracing::info!("Genres: {}", details.genres.join(", "));
    tracing::info!("Director: {}", details.director.clone().unwrap_or_else(dash));
    tracing::info!("Cast: {}", details.actors.join(", "));
    tracing::info!("Plot: {}", details.plot.clone().unwrap_or_else(dash));
    tracing::info!("IMDb: {}", imdb_url(&details.summary.id));
    tracing::info!(
        "Favorite: {}",
        if favorites.is_favorite(&details.summary.id) {
            "yes"
        } else {
            "no"
        }
    );

    Ok(())
}

/// Runs the `favorites list` subcommand.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
#[instrument(skip_all)]
fn run_favorites_list(dir: Option<&PathBuf>) -> Result<()> {
    let favorites = open_favorites(dir)?;

    if favorites.is_empty() {
        tracing::info!("No favorites yet. Run `favorites add --id <IMDB_ID>` or press f in `browse`.");
        return Ok(());
    }

    tracing::info!("IMDb ID\t\tYear\t\tTitle");
    for movie in favorites.list() {
        tracing::info!("{}\t{}\t\t{}", movie.id, movie.year, movie.title);
    }
    tracing::info!("Total: {} favorites", favorites.len());

    Ok(())
}

/// Runs the `favorites add` and `favorites toggle` subcommands.
///
/// The title is looked up first so the stored entry carries its summary.
///
/// # Errors
///
/// Returns an error if the lookup or the database open fails.
#[instrument(skip_all)]
async fn run_favorites_update(
    args: &FavoriteIdArgs,
    dir: Option<&PathBuf>,
    toggle: bool,
) -> Result<()> {
    let mut favorites = open_favorites(dir)?;

    if !toggle && favorites.is_favorite(&args.id) {
        tracing::info!("{} is already a favorite", args.id);
        return Ok(());
    }
    if toggle && favorites.remove(&args.id) {
        tracing::info!("Removed {} from favorites", args.id);
        return Ok(());
    }

    let config = load_config(dir)?;
    let client = build_omdb_client(&config)?;
    let details = client
        .movie_details(&args.id)
        .await
        .with_context(|| format!("failed to look up {}", args.id))?;

    favorites.add(&details.summary);
    tracing::info!(
        "Added {} ({}) to favorites",
        details.summary.title,
        details.summary.id
    );

    Ok(())
}

/// Runs the `favorites remove` subcommand.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
#[instrument(skip_all)]
fn run_favorites_remove(args: &FavoriteIdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let mut favorites = open_favorites(dir)?;

    if favorites.remove(&args.id) {
        tracing::info!("Removed {} from favorites", args.id);
    } else {
        tracing::info!("{} is not a favorite", args.id);
    }

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client, database or TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_omdb_client(&config)?;
    let favorites = open_favorites(dir)?;

    tracing::info!(favorites = favorites.len(), "launching browser");
    run_browser(client, favorites, search_settings(&config.search))
        .await
        .context("browser TUI failed")
}

/// Chooses where logs go: a file while the TUI owns the terminal, stdout otherwise.
fn log_writer(command: &Commands, dir: Option<&PathBuf>) -> Result<(BoxMakeWriter, bool)> {
    if !matches!(command, Commands::Browse) {
        return Ok((BoxMakeWriter::new(std::io::stdout), true));
    }

    let data_dir = resolve_data_dir(dir).context("failed to resolve data directory")?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create directory {}", data_dir.display()))?;
    let path = data_dir.join(BROWSE_LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    Ok((BoxMakeWriter::new(Mutex::new(file)), false))
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (writer, ansi) = log_writer(&cli.command, cli.dir.as_ref())?;

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Details(args) => run_details(&args, dir).await,
        Commands::Favorites(fav) => match fav.command {
            FavoritesSubcommands::List => run_favorites_list(dir),
            FavoritesSubcommands::Add(args) => run_favorites_update(&args, dir, false).await,
            FavoritesSubcommands::Remove(args) => run_favorites_remove(&args, dir),
            FavoritesSubcommands::Toggle(args) => run_favorites_update(&args, dir, true).await,
        },
        Commands::Browse => run_browse(dir).await,
    }
}

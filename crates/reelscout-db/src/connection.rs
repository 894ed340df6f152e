//! Database connection management.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations::run_migrations;

/// Database file name.
const DB_FILE_NAME: &str = "reelscout.db";

/// Per-application directory under the data home.
const APP_DIR_NAME: &str = "reelscout";

/// Opens (or creates) the database and runs migrations.
///
/// - If `dir` is `Some`, uses `{dir}/reelscout.db`.
/// - Otherwise uses `reelscout.db` inside [`resolve_data_dir`].
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrations fail.
pub fn open_db(dir: Option<&PathBuf>) -> Result<Connection> {
    let db_path = resolve_db_path(dir)?;

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;

    run_migrations(&conn).context("database migration failed")?;
    tracing::debug!(path = %db_path.display(), "database opened");

    Ok(conn)
}

/// Resolves the local data directory.
///
/// - If `dir` is `Some`, returns it unchanged.
/// - Otherwise returns `$XDG_DATA_HOME/reelscout`, falling back to
///   `~/.local/share/reelscout`.
///
/// # Errors
///
/// Returns an error if neither `XDG_DATA_HOME` nor `HOME` is set (when `dir` is `None`).
pub fn resolve_data_dir(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.clone());
    }

    default_data_dir(
        std::env::var("XDG_DATA_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

/// Default data directory from the given `XDG_DATA_HOME` and `HOME` values.
///
/// An empty `XDG_DATA_HOME` counts as unset.
fn default_data_dir(xdg_data_home: Option<String>, home: Option<String>) -> Result<PathBuf> {
    if let Some(xdg) = xdg_data_home.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(APP_DIR_NAME));
    }

    let home = home.context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join(APP_DIR_NAME))
}

/// Resolves the database file path.
fn resolve_db_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    Ok(resolve_data_dir(dir)?.join(DB_FILE_NAME))
}

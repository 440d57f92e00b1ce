//! Shared `SQLite` handle construction and shutdown.
//!
//! The pool is the one long-lived resource the repositories' suspensions
//! target. It is created explicitly from a [`StoreConfig`] and threaded
//! through repository constructors — never a global — and closed with a
//! single well-defined [`close`] call. Serialising access to it is the
//! pool's own concern; the coroutine driver imposes no locking of its own.

use std::fs;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::{AppError, Result, StoreConfig};

use super::schema;

/// Connect to the configured database file and apply the schema.
///
/// Parent directories are created as needed and the file itself on first
/// use.
///
/// # Errors
///
/// Returns `AppError::Db` if the connection or schema application fails and
/// `AppError::Io` if the parent directory cannot be created.
pub async fn connect(config: &StoreConfig) -> Result<SqlitePool> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| AppError::Io(format!("failed to create db dir: {err}")))?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(true)
        .busy_timeout(config.busy_timeout());

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    schema::bootstrap_schema(&pool).await?;
    info!(path = %config.database_path.display(), "database connected");
    Ok(pool)
}

/// Connect to an in-memory database for tests and apply the schema.
///
/// Pinned to a single connection: each `SQLite` in-memory connection is its
/// own database, so the pool must never open a second one.
///
/// # Errors
///
/// Returns `AppError::Db` if the connection or schema application fails.
pub async fn connect_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    schema::bootstrap_schema(&pool).await?;
    Ok(pool)
}

/// Shut down the shared handle, waiting for checked-out connections.
pub async fn close(pool: &SqlitePool) {
    pool.close().await;
    info!("database closed");
}

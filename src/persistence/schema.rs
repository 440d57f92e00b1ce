//! `SQLite` schema bootstrap logic.
//!
//! All table definitions use `CREATE TABLE IF NOT EXISTS` — safe to
//! re-run on every connect. Produces a convergent result.

use sqlx::SqlitePool;

use crate::Result;

/// Apply all table definitions to the connected `SQLite` database.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS priority (
    id              TEXT PRIMARY KEY NOT NULL,
    name            TEXT NOT NULL,
    shortname       TEXT NOT NULL,
    description     TEXT,
    icon            TEXT,
    rank            INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS ticket (
    id              TEXT PRIMARY KEY NOT NULL,
    subject         TEXT NOT NULL,
    description     TEXT,
    status          TEXT NOT NULL CHECK(status IN ('open','pending','resolved','closed')),
    priority_id     TEXT,
    reporter        TEXT NOT NULL,
    assignee        TEXT,
    labels          TEXT NOT NULL DEFAULT '[]',
    archived        INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL,
    closed_at       TEXT
);

CREATE INDEX IF NOT EXISTS idx_ticket_status ON ticket(status);
CREATE INDEX IF NOT EXISTS idx_ticket_priority ON ticket(priority_id);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}

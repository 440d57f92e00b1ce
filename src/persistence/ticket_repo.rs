//! Ticket repository: every data access runs as a stepwise computation.
//!
//! Each method constructs a fresh [`Script`] whose suspensions wrap queries
//! against the shared pool, then hands it to [`drive`]. Multi-step methods
//! (`create` with a priority, `update`, `delete`) demonstrate sequential
//! suspensions within one computation; the continuations' `Err` arms are
//! where injected database failures surface.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, SqlitePool};

use crate::coro::{drive, Script};
use crate::models::ticket::{Ticket, TicketStatus};
use crate::{AppError, Result};

use super::repository::{RepoFuture, Repository};

/// Selection criteria for [`Repository::find`] on tickets.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    /// Restrict to one lifecycle status.
    pub status: Option<TicketStatus>,
    /// Restrict to one assignee.
    pub assignee: Option<String>,
    /// Include archived tickets; default listings hide them.
    pub include_archived: bool,
}

/// Repository for [`Ticket`] records on the shared `SQLite` handle.
#[derive(Clone)]
pub struct TicketRepo {
    pool: SqlitePool,
}

impl TicketRepo {
    /// Create a new repository instance over the shared pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Hard-delete a record. Idempotent: erasing a missing ticket is a
    /// no-op. The soft variant is [`Repository::delete`], which archives.
    pub fn erase(&self, id: &str) -> RepoFuture<'_, ()> {
        let pool = self.pool.clone();
        let id = id.to_owned();
        Box::pin(async move { drive(erase_script(pool, id)).await })
    }
}

impl Repository for TicketRepo {
    type Entity = Ticket;
    type Filter = TicketFilter;

    fn create(&self, item: Ticket) -> RepoFuture<'_, Ticket> {
        let pool = self.pool.clone();
        Box::pin(async move { drive(create_script(pool, item)).await })
    }

    fn update(&self, id: &str, item: Ticket) -> RepoFuture<'_, Ticket> {
        let pool = self.pool.clone();
        let id = id.to_owned();
        Box::pin(async move { drive(update_script(pool, id, item)).await })
    }

    fn delete(&self, id: &str) -> RepoFuture<'_, ()> {
        let pool = self.pool.clone();
        let id = id.to_owned();
        Box::pin(async move { drive(archive_script(pool, id)).await })
    }

    fn find(&self, filter: TicketFilter) -> RepoFuture<'_, Vec<Ticket>> {
        let pool = self.pool.clone();
        Box::pin(async move { drive(find_script(pool, filter)).await })
    }

    fn find_one(&self, id: &str) -> RepoFuture<'_, Ticket> {
        let pool = self.pool.clone();
        let id = id.to_owned();
        Box::pin(async move { drive(find_one_script(pool, id)).await })
    }
}

/// Row shape shared by the row-returning ticket queries. Statement
/// executions resume with an empty row set, mirroring how a row-oriented
/// client reports DML, so every suspension in one script carries one type.
#[derive(Debug, Clone, sqlx::FromRow)]
struct TicketRow {
    id: String,
    subject: String,
    description: Option<String>,
    status: String,
    priority_id: Option<String>,
    reporter: String,
    assignee: Option<String>,
    labels: String,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

impl TicketRow {
    fn into_ticket(self) -> Result<Ticket> {
        let status = TicketStatus::parse(&self.status)
            .ok_or_else(|| AppError::Db(format!("unknown ticket status '{}'", self.status)))?;
        let labels: Vec<String> = serde_json::from_str(&self.labels)
            .map_err(|err| AppError::Db(format!("corrupt labels column: {err}")))?;
        Ok(Ticket {
            id: self.id,
            subject: self.subject,
            description: self.description,
            status,
            priority_id: self.priority_id,
            reporter: self.reporter,
            assignee: self.assignee,
            labels,
            archived: self.archived,
            created_at: self.created_at,
            updated_at: self.updated_at,
            closed_at: self.closed_at,
        })
    }
}

type TicketScript<T> = Script<Vec<TicketRow>, T, AppError>;

fn create_script(pool: SqlitePool, ticket: Ticket) -> Script<i64, Ticket, AppError> {
    match ticket.priority_id.clone() {
        Some(priority_id) => Script::suspend(
            count_priority(pool.clone(), priority_id.clone()),
            move |found| match found {
                Ok(0) => Script::fail(AppError::NotFound(format!(
                    "priority {priority_id} does not exist"
                ))),
                Ok(_) => insert_link(pool, ticket),
                Err(err) => Script::fail(err),
            },
        ),
        None => insert_link(pool, ticket),
    }
}

fn insert_link(pool: SqlitePool, ticket: Ticket) -> Script<i64, Ticket, AppError> {
    let labels = match serde_json::to_string(&ticket.labels) {
        Ok(labels) => labels,
        Err(err) => return Script::fail(AppError::Db(format!("labels serialisation: {err}"))),
    };
    let stored = ticket.clone();
    Script::suspend(insert_ticket(pool, ticket, labels), move |inserted| {
        match inserted {
            Ok(_) => Script::done(stored),
            Err(err) => Script::fail(err),
        }
    })
}

fn update_script(pool: SqlitePool, id: String, item: Ticket) -> TicketScript<Ticket> {
    Script::suspend(
        select_by_id(pool.clone(), id.clone()),
        move |fetched| match fetched {
            Ok(rows) => {
                let Some(row) = rows.into_iter().next() else {
                    return Script::fail(AppError::NotFound(format!("ticket {id} not found")));
                };
                let current = match row.into_ticket() {
                    Ok(current) => current,
                    Err(err) => return Script::fail(err),
                };
                if current.status != item.status && !current.can_transition_to(item.status) {
                    return Script::fail(AppError::Db("invalid ticket status transition".into()));
                }
                let mut updated = item;
                updated.id = id;
                // Reporter and creation time are immutable after create.
                updated.reporter = current.reporter;
                updated.created_at = current.created_at;
                updated.updated_at = Utc::now();
                if updated.status == TicketStatus::Closed && updated.closed_at.is_none() {
                    updated.closed_at = Some(Utc::now());
                }
                let labels = match serde_json::to_string(&updated.labels) {
                    Ok(labels) => labels,
                    Err(err) => {
                        return Script::fail(AppError::Db(format!("labels serialisation: {err}")))
                    }
                };
                let stored = updated.clone();
                Script::suspend(apply_update(pool, updated, labels), move |applied| {
                    match applied {
                        Ok(_) => Script::done(stored),
                        Err(err) => Script::fail(err),
                    }
                })
            }
            Err(err) => Script::fail(err),
        },
    )
}

fn archive_script(pool: SqlitePool, id: String) -> TicketScript<()> {
    Script::suspend(
        select_by_id(pool.clone(), id.clone()),
        move |fetched| match fetched {
            Ok(rows) => match rows.into_iter().next() {
                None => Script::fail(AppError::NotFound(format!("ticket {id} not found"))),
                Some(row) if row.archived => Script::fail(AppError::AlreadyArchived(format!(
                    "ticket {id} is already archived"
                ))),
                Some(_) => Script::suspend(mark_archived(pool, id), |marked| match marked {
                    Ok(_) => Script::done(()),
                    Err(err) => Script::fail(err),
                }),
            },
            Err(err) => Script::fail(err),
        },
    )
}

fn find_script(pool: SqlitePool, filter: TicketFilter) -> TicketScript<Vec<Ticket>> {
    Script::suspend(select_filtered(pool, filter), |fetched| match fetched {
        Ok(rows) => {
            let tickets: Result<Vec<Ticket>> =
                rows.into_iter().map(TicketRow::into_ticket).collect();
            match tickets {
                Ok(tickets) => Script::done(tickets),
                Err(err) => Script::fail(err),
            }
        }
        Err(err) => Script::fail(err),
    })
}

fn find_one_script(pool: SqlitePool, id: String) -> TicketScript<Ticket> {
    Script::suspend(select_by_id(pool, id.clone()), move |fetched| {
        match fetched {
            Ok(rows) => match rows.into_iter().next() {
                Some(row) => match row.into_ticket() {
                    Ok(ticket) => Script::done(ticket),
                    Err(err) => Script::fail(err),
                },
                None => Script::fail(AppError::NotFound(format!("ticket {id} not found"))),
            },
            Err(err) => Script::fail(err),
        }
    })
}

fn erase_script(pool: SqlitePool, id: String) -> TicketScript<()> {
    Script::suspend(delete_row(pool, id), |deleted| match deleted {
        Ok(_) => Script::done(()),
        Err(err) => Script::fail(err),
    })
}

async fn select_by_id(pool: SqlitePool, id: String) -> Result<Vec<TicketRow>> {
    let rows = sqlx::query_as::<_, TicketRow>("SELECT * FROM ticket WHERE id = ?")
        .bind(id)
        .fetch_all(&pool)
        .await?;
    Ok(rows)
}

async fn count_priority(pool: SqlitePool, priority_id: String) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM priority WHERE id = ?")
        .bind(priority_id)
        .fetch_one(&pool)
        .await?;
    Ok(count)
}

async fn select_filtered(pool: SqlitePool, filter: TicketFilter) -> Result<Vec<TicketRow>> {
    let mut query = QueryBuilder::new("SELECT * FROM ticket WHERE 1 = 1");
    if !filter.include_archived {
        query.push(" AND archived = 0");
    }
    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(assignee) = filter.assignee {
        query.push(" AND assignee = ").push_bind(assignee);
    }
    query.push(" ORDER BY updated_at DESC");
    let rows = query.build_query_as::<TicketRow>().fetch_all(&pool).await?;
    Ok(rows)
}

async fn insert_ticket(pool: SqlitePool, ticket: Ticket, labels: String) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO ticket (id, subject, description, status, priority_id, reporter, \
         assignee, labels, archived, created_at, updated_at, closed_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&ticket.id)
    .bind(&ticket.subject)
    .bind(&ticket.description)
    .bind(ticket.status.as_str())
    .bind(&ticket.priority_id)
    .bind(&ticket.reporter)
    .bind(&ticket.assignee)
    .bind(labels)
    .bind(ticket.archived)
    .bind(ticket.created_at)
    .bind(ticket.updated_at)
    .bind(ticket.closed_at)
    .execute(&pool)
    .await?;
    Ok(i64::try_from(result.rows_affected()).unwrap_or(i64::MAX))
}

async fn apply_update(pool: SqlitePool, ticket: Ticket, labels: String) -> Result<Vec<TicketRow>> {
    sqlx::query(
        "UPDATE ticket SET subject = ?, description = ?, status = ?, priority_id = ?, \
         assignee = ?, labels = ?, archived = ?, updated_at = ?, closed_at = ? WHERE id = ?",
    )
    .bind(&ticket.subject)
    .bind(&ticket.description)
    .bind(ticket.status.as_str())
    .bind(&ticket.priority_id)
    .bind(&ticket.assignee)
    .bind(labels)
    .bind(ticket.archived)
    .bind(ticket.updated_at)
    .bind(ticket.closed_at)
    .bind(&ticket.id)
    .execute(&pool)
    .await?;
    Ok(Vec::new())
}

async fn mark_archived(pool: SqlitePool, id: String) -> Result<Vec<TicketRow>> {
    sqlx::query("UPDATE ticket SET archived = 1, updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(id)
        .execute(&pool)
        .await?;
    Ok(Vec::new())
}

async fn delete_row(pool: SqlitePool, id: String) -> Result<Vec<TicketRow>> {
    sqlx::query("DELETE FROM ticket WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;
    Ok(Vec::new())
}

//! Priority repository.
//!
//! Priorities are reference data: the capability set's `delete` is left at
//! its unsupported default, since tickets may point at any priority row.

use sqlx::SqlitePool;

use crate::coro::{drive, Script};
use crate::models::priority::Priority;
use crate::{AppError, Result};

use super::repository::{RepoFuture, Repository};

/// Repository for [`Priority`] records on the shared `SQLite` handle.
#[derive(Clone)]
pub struct PriorityRepo {
    pool: SqlitePool,
}

impl PriorityRepo {
    /// Create a new repository instance over the shared pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl Repository for PriorityRepo {
    type Entity = Priority;
    type Filter = ();

    fn create(&self, item: Priority) -> RepoFuture<'_, Priority> {
        let pool = self.pool.clone();
        Box::pin(async move { drive(create_script(pool, item)).await })
    }

    fn update(&self, id: &str, item: Priority) -> RepoFuture<'_, Priority> {
        let pool = self.pool.clone();
        let id = id.to_owned();
        Box::pin(async move { drive(update_script(pool, id, item)).await })
    }

    fn find(&self, _filter: ()) -> RepoFuture<'_, Vec<Priority>> {
        let pool = self.pool.clone();
        Box::pin(async move { drive(list_script(pool)).await })
    }

    fn find_one(&self, id: &str) -> RepoFuture<'_, Priority> {
        let pool = self.pool.clone();
        let id = id.to_owned();
        Box::pin(async move { drive(find_one_script(pool, id)).await })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct PriorityRow {
    id: String,
    name: String,
    shortname: String,
    description: Option<String>,
    icon: Option<String>,
    rank: i64,
}

impl PriorityRow {
    fn into_priority(self) -> Priority {
        Priority {
            id: self.id,
            name: self.name,
            shortname: self.shortname,
            description: self.description,
            icon: self.icon,
            rank: self.rank,
        }
    }
}

type PriorityScript<T> = Script<Vec<PriorityRow>, T, AppError>;

fn create_script(pool: SqlitePool, priority: Priority) -> PriorityScript<Priority> {
    let stored = priority.clone();
    Script::suspend(insert_priority(pool, priority), move |inserted| {
        match inserted {
            Ok(_) => Script::done(stored),
            Err(err) => Script::fail(err),
        }
    })
}

fn update_script(pool: SqlitePool, id: String, item: Priority) -> PriorityScript<Priority> {
    Script::suspend(
        select_by_id(pool.clone(), id.clone()),
        move |fetched| match fetched {
            Ok(rows) => {
                if rows.is_empty() {
                    return Script::fail(AppError::NotFound(format!("priority {id} not found")));
                }
                let mut updated = item;
                updated.id = id;
                let stored = updated.clone();
                Script::suspend(apply_update(pool, updated), move |applied| match applied {
                    Ok(_) => Script::done(stored),
                    Err(err) => Script::fail(err),
                })
            }
            Err(err) => Script::fail(err),
        },
    )
}

fn list_script(pool: SqlitePool) -> PriorityScript<Vec<Priority>> {
    Script::suspend(select_all(pool), |fetched| match fetched {
        Ok(rows) => Script::done(rows.into_iter().map(PriorityRow::into_priority).collect()),
        Err(err) => Script::fail(err),
    })
}

fn find_one_script(pool: SqlitePool, id: String) -> PriorityScript<Priority> {
    Script::suspend(select_by_id(pool, id.clone()), move |fetched| {
        match fetched {
            Ok(rows) => match rows.into_iter().next() {
                Some(row) => Script::done(row.into_priority()),
                None => Script::fail(AppError::NotFound(format!("priority {id} not found"))),
            },
            Err(err) => Script::fail(err),
        }
    })
}

async fn select_by_id(pool: SqlitePool, id: String) -> Result<Vec<PriorityRow>> {
    let rows = sqlx::query_as::<_, PriorityRow>("SELECT * FROM priority WHERE id = ?")
        .bind(id)
        .fetch_all(&pool)
        .await?;
    Ok(rows)
}

async fn select_all(pool: SqlitePool) -> Result<Vec<PriorityRow>> {
    let rows = sqlx::query_as::<_, PriorityRow>("SELECT * FROM priority ORDER BY rank ASC, name ASC")
        .fetch_all(&pool)
        .await?;
    Ok(rows)
}

async fn insert_priority(pool: SqlitePool, priority: Priority) -> Result<Vec<PriorityRow>> {
    sqlx::query(
        "INSERT INTO priority (id, name, shortname, description, icon, rank) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&priority.id)
    .bind(&priority.name)
    .bind(&priority.shortname)
    .bind(&priority.description)
    .bind(&priority.icon)
    .bind(priority.rank)
    .execute(&pool)
    .await?;
    Ok(Vec::new())
}

async fn apply_update(pool: SqlitePool, priority: Priority) -> Result<Vec<PriorityRow>> {
    sqlx::query(
        "UPDATE priority SET name = ?, shortname = ?, description = ?, icon = ?, rank = ? \
         WHERE id = ?",
    )
    .bind(&priority.name)
    .bind(&priority.shortname)
    .bind(&priority.description)
    .bind(&priority.icon)
    .bind(priority.rank)
    .bind(&priority.id)
    .execute(&pool)
    .await?;
    Ok(Vec::new())
}

//! Persistence layer modules.
//!
//! The engine's primary consumer: every repository method here is a stepwise
//! computation whose suspensions are queries against the shared pool.

pub mod db;
pub mod priority_repo;
pub mod repository;
pub mod schema;
pub mod ticket_repo;

/// Re-export the database pool type for convenience.
pub use sqlx::SqlitePool;

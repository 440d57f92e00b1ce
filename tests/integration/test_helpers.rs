//! Shared helpers for integration tests.

use std::sync::Once;

use percolate::models::priority::Priority;
use percolate::persistence::priority_repo::PriorityRepo;
use percolate::persistence::repository::Repository;
use percolate::persistence::{db, SqlitePool};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Fresh in-memory pool with the schema applied.
pub async fn memory_pool() -> SqlitePool {
    init_tracing();
    db::connect_memory()
        .await
        .expect("in-memory connect should succeed")
}

/// Seed one priority row and return it.
pub async fn seed_priority(pool: &SqlitePool, name: &str, shortname: &str, rank: i64) -> Priority {
    let repo = PriorityRepo::new(pool.clone());
    repo.create(Priority::new(name.into(), shortname.into(), rank))
        .await
        .expect("seed priority")
}

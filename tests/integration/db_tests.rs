//! Integration tests for the shared handle: connect, bootstrap, close.

use percolate::persistence::db;
use percolate::StoreConfig;

use super::test_helpers;

#[tokio::test]
async fn in_memory_connect_creates_both_tables() {
    let pool = test_helpers::memory_pool().await;

    for table in ["ticket", "priority"] {
        let query = format!("SELECT COUNT(*) FROM {table}");
        let count: i64 = sqlx::query_scalar(&query)
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("table '{table}' should be queryable: {e}"));
        assert_eq!(count, 0, "table '{table}' should start empty");
    }
}

#[tokio::test]
async fn file_backed_connect_is_idempotent_and_persistent() {
    test_helpers::init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    let config = StoreConfig::from_toml_str(&format!(
        r#"database_path = "{}""#,
        dir.path().join("nested").join("store.db").display()
    ))
    .expect("config should parse");

    let pool = db::connect(&config).await.expect("first connect");
    sqlx::query("INSERT INTO priority (id, name, shortname, rank) VALUES ('p1', 'Low', 'LOW', 9)")
        .execute(&pool)
        .await
        .expect("insert seed row");
    db::close(&pool).await;
    assert!(pool.is_closed());

    // Re-running the bootstrap must not disturb existing rows.
    let pool = db::connect(&config).await.expect("second connect");
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM priority")
        .fetch_one(&pool)
        .await
        .expect("count rows");
    assert_eq!(count, 1);
    db::close(&pool).await;
}

//! Integration tests for the storage engine lifecycle.
//!
//! These open real SQLite databases (in memory, or in a temporary
//! directory) and check schema creation, reopening, and teardown.

use std::sync::Arc;
use std::time::Duration;

use stronghold_storage::{schema, sqlx, Database, StorageConfig, StorageError};

async fn table_names(db: &Database) -> Vec<String> {
    let lease = db.acquire().await.unwrap();
    sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(lease.pool())
    .await
    .unwrap()
}

// =========================================================================
// open()
// =========================================================================

#[tokio::test]
async fn test_open_in_memory_creates_all_tables() {
    let db = Database::open(&StorageConfig::in_memory()).await.unwrap();

    let names = table_names(&db).await;

    for table in schema::TABLES {
        assert!(names.iter().any(|n| n == table), "missing table {table}");
    }
}

#[tokio::test]
async fn test_open_existing_file_preserves_rows() {
    // Startup against an existing store must be a no-op for data.
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::file(dir.path().join("core.db"));

    let db = Database::open(&config).await.unwrap();
    {
        let lease = db.acquire().await.unwrap();
        sqlx::query("INSERT INTO balances (player_id, balance) VALUES ('p', 7.5)")
            .execute(lease.pool())
            .await
            .unwrap();
    }
    db.close().await;

    let reopened = Database::open(&config).await.unwrap();
    let lease = reopened.acquire().await.unwrap();
    let balance: f64 = sqlx::query_scalar("SELECT balance FROM balances WHERE player_id = 'p'")
        .fetch_one(lease.pool())
        .await
        .unwrap();
    assert_eq!(balance, 7.5);
}

#[tokio::test]
async fn test_open_unreachable_path_returns_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    // The parent directory does not exist, so SQLite cannot create the file.
    let config = StorageConfig::file(dir.path().join("missing").join("core.db"));

    let result = Database::open(&config).await;

    assert!(matches!(result, Err(StorageError::Unavailable(_))));
}

#[tokio::test]
async fn test_schema_rejects_negative_balance() {
    let db = Database::open(&StorageConfig::in_memory()).await.unwrap();
    let lease = db.acquire().await.unwrap();

    let result = sqlx::query("INSERT INTO balances (player_id, balance) VALUES ('p', -1)")
        .execute(lease.pool())
        .await;

    assert!(result.is_err(), "CHECK constraint should reject negatives");
}

#[tokio::test]
async fn test_schema_spawn_allows_only_singleton_key() {
    let db = Database::open(&StorageConfig::in_memory()).await.unwrap();
    let lease = db.acquire().await.unwrap();

    let result = sqlx::query(
        "INSERT INTO spawn (id, world, x, y, z, yaw, pitch) VALUES (2, 'w', 0, 0, 0, 0, 0)",
    )
    .execute(lease.pool())
    .await;

    assert!(result.is_err());
}

// =========================================================================
// close()
// =========================================================================

#[tokio::test]
async fn test_close_is_idempotent() {
    let db = Database::open(&StorageConfig::in_memory()).await.unwrap();

    db.close().await;
    db.close().await;

    assert!(db.is_closed().await);
}

#[tokio::test]
async fn test_acquire_after_close_returns_closed() {
    let db = Database::open(&StorageConfig::in_memory()).await.unwrap();
    db.close().await;

    let result = db.acquire().await;

    assert!(matches!(result, Err(StorageError::Closed)));
}

#[tokio::test]
async fn test_close_waits_for_in_flight_lease() {
    let db = Arc::new(Database::open(&StorageConfig::in_memory()).await.unwrap());

    let lease = db.acquire().await.unwrap();

    let closer = {
        let db = Arc::clone(&db);
        tokio::spawn(async move { db.close().await })
    };

    // While the lease is held, close() must not finish.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!closer.is_finished(), "close should wait for the lease");

    // The in-flight operation can still use the pool.
    sqlx::query("SELECT 1").execute(lease.pool()).await.unwrap();
    drop(lease);

    closer.await.unwrap();
    assert!(db.is_closed().await);
}

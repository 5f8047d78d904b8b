//! Integration tests for the audit log.

use std::sync::Arc;

use stronghold_audit::{AuditStore, NEAR_QUERY_LIMIT};
use stronghold_storage::{Database, StorageConfig, StorageError};
use stronghold_types::{AuditAction, BlockPos, PlayerId};

async fn store() -> AuditStore {
    let db = Database::open(&StorageConfig::in_memory()).await.unwrap();
    AuditStore::new(Arc::new(db))
}

#[tokio::test]
async fn test_append_then_query_near_returns_record() {
    let store = store().await;
    let player = PlayerId::random();
    let pos = BlockPos::new(10, 64, -20);

    let id = store
        .append(player, AuditAction::Place, "overworld", pos, "chest")
        .await
        .unwrap();

    let records = store.query_near("overworld", pos).await;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, id);
    assert_eq!(record.player, player);
    assert_eq!(record.action, AuditAction::Place);
    assert_eq!(record.world, "overworld");
    assert_eq!(record.pos, pos);
    assert_eq!(record.object_kind, "chest");
}

#[tokio::test]
async fn test_query_near_after_twelve_appends_returns_ten_newest_first() {
    let store = store().await;
    let player = PlayerId::random();
    let pos = BlockPos::new(0, 70, 0);

    let mut ids = Vec::new();
    for _ in 0..12 {
        let id = store
            .append(player, AuditAction::Break, "overworld", pos, "stone")
            .await
            .unwrap();
        ids.push(id);
    }

    let records = store.query_near("overworld", pos).await;

    assert_eq!(records.len(), NEAR_QUERY_LIMIT as usize);
    let returned: Vec<i64> = records.iter().map(|r| r.id).collect();
    let expected: Vec<i64> = ids.iter().rev().take(10).copied().collect();
    assert_eq!(returned, expected);
    assert!(records.windows(2).all(|w| w[0].recorded_at >= w[1].recorded_at));
}

#[tokio::test]
async fn test_query_near_exact_coordinate_only() {
    let store = store().await;
    let player = PlayerId::random();
    let pos = BlockPos::new(5, 5, 5);
    store
        .append(player, AuditAction::Place, "overworld", pos, "torch")
        .await
        .unwrap();
    store
        .append(player, AuditAction::Place, "overworld", BlockPos::new(5, 5, 6), "torch")
        .await
        .unwrap();
    store
        .append(player, AuditAction::Place, "nether", pos, "torch")
        .await
        .unwrap();

    assert_eq!(store.query_near("overworld", pos).await.len(), 1);
    assert!(store.query_near("the_end", pos).await.is_empty());
}

#[tokio::test]
async fn test_recent_at_honors_limit() {
    let store = store().await;
    let player = PlayerId::random();
    let pos = BlockPos::new(1, 2, 3);
    for _ in 0..5 {
        store
            .append(player, AuditAction::Interact, "overworld", pos, "lever")
            .await
            .unwrap();
    }

    assert_eq!(store.recent_at("overworld", pos, 3).await.len(), 3);
    assert_eq!(store.recent_at("overworld", pos, 50).await.len(), 5);
}

#[tokio::test]
async fn test_append_custom_action_reads_back() {
    let store = store().await;
    let pos = BlockPos::new(0, 0, 0);
    store
        .append(PlayerId::random(), AuditAction::from("ignite"), "overworld", pos, "tnt")
        .await
        .unwrap();

    let records = store.query_near("overworld", pos).await;

    assert_eq!(records[0].action, AuditAction::Other("ignite".into()));
}

#[tokio::test]
async fn test_audit_after_close_degrades() {
    let db = Arc::new(Database::open(&StorageConfig::in_memory()).await.unwrap());
    let store = AuditStore::new(Arc::clone(&db));
    let pos = BlockPos::new(0, 0, 0);

    db.close().await;

    assert!(store.query_near("overworld", pos).await.is_empty());
    assert!(matches!(
        store
            .append(PlayerId::random(), AuditAction::Place, "overworld", pos, "dirt")
            .await,
        Err(StorageError::Closed)
    ));
}

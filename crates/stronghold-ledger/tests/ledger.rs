//! Integration tests for the ledger store.

use std::sync::Arc;

use futures_util::future::join_all;
use stronghold_ledger::{Debit, LedgerStore};
use stronghold_storage::{Database, StorageConfig, StorageError};
use stronghold_types::PlayerId;

async fn ledger() -> LedgerStore {
    let db = Database::open(&StorageConfig::in_memory()).await.unwrap();
    LedgerStore::new(Arc::new(db))
}

// =========================================================================
// Reads and writes
// =========================================================================

#[tokio::test]
async fn test_get_balance_absent_is_zero() {
    let ledger = ledger().await;
    assert_eq!(ledger.get_balance(PlayerId::random()).await, 0.0);
}

#[tokio::test]
async fn test_set_balance_then_get_returns_value() {
    let ledger = ledger().await;
    let player = PlayerId::random();

    for value in [0.0, 1.5, 100.0, 98_765.25] {
        ledger.set_balance(player, value).await.unwrap();
        assert_eq!(ledger.get_balance(player).await, value);
    }
}

#[tokio::test]
async fn test_set_balance_negative_stores_zero() {
    let ledger = ledger().await;
    let player = PlayerId::random();

    ledger.set_balance(player, -5.0).await.unwrap();

    assert_eq!(ledger.get_balance(player).await, 0.0);
}

#[tokio::test]
async fn test_add_balance_twice_equals_single_add() {
    let ledger = ledger().await;
    let split = PlayerId::random();
    let single = PlayerId::random();
    ledger.set_balance(split, 10.0).await.unwrap();
    ledger.set_balance(single, 10.0).await.unwrap();

    ledger.add_balance(split, 2.5).await.unwrap();
    ledger.add_balance(split, 4.0).await.unwrap();
    ledger.add_balance(single, 6.5).await.unwrap();

    assert_eq!(ledger.get_balance(split).await, ledger.get_balance(single).await);
    assert_eq!(ledger.get_balance(split).await, 16.5);
}

#[tokio::test]
async fn test_add_balance_creates_missing_row() {
    let ledger = ledger().await;
    let player = PlayerId::random();

    let balance = ledger.add_balance(player, 30.0).await.unwrap();

    assert_eq!(balance, 30.0);
    assert_eq!(ledger.get_balance(player).await, 30.0);
}

// =========================================================================
// Overdraft
// =========================================================================

#[tokio::test]
async fn test_remove_balance_within_funds() {
    let ledger = ledger().await;
    let player = PlayerId::random();
    ledger.set_balance(player, 50.0).await.unwrap();

    let balance = ledger.remove_balance(player, 20.0).await.unwrap();

    assert_eq!(balance, 30.0);
}

#[tokio::test]
async fn test_remove_balance_beyond_funds_clamps_to_zero() {
    let ledger = ledger().await;
    let player = PlayerId::random();
    ledger.set_balance(player, 50.0).await.unwrap();

    for amount in [50.0, 51.0, 1_000_000.0] {
        let balance = ledger.remove_balance(player, amount).await.unwrap();
        assert_eq!(balance, 0.0);
        assert_eq!(ledger.get_balance(player).await, 0.0);
        ledger.set_balance(player, 50.0).await.unwrap();
    }
}

#[tokio::test]
async fn test_debit_reports_clamping() {
    let ledger = ledger().await;
    let player = PlayerId::random();
    ledger.set_balance(player, 40.0).await.unwrap();

    let covered = ledger.debit(player, 15.0).await.unwrap();
    let short = ledger.debit(player, 100.0).await.unwrap();

    assert_eq!(
        covered,
        Debit {
            balance: 25.0,
            clamped: false
        }
    );
    assert_eq!(
        short,
        Debit {
            balance: 0.0,
            clamped: true
        }
    );
}

#[tokio::test]
async fn test_debit_exact_balance_is_not_clamped() {
    let ledger = ledger().await;
    let player = PlayerId::random();
    ledger.set_balance(player, 40.0).await.unwrap();

    let debit = ledger.debit(player, 40.0).await.unwrap();

    assert!(!debit.clamped);
    assert_eq!(debit.balance, 0.0);
}

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_add_balance_concurrent_converges() {
    // A pooled file database, so the adds really overlap.
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&StorageConfig::file(dir.path().join("ledger.db")))
        .await
        .unwrap();
    let ledger = LedgerStore::new(Arc::new(db));
    let player = PlayerId::random();

    let tasks = (0..100).map(|_| {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.add_balance(player, 10.0).await })
    });
    for outcome in join_all(tasks).await {
        outcome.unwrap().unwrap();
    }

    assert_eq!(ledger.get_balance(player).await, 1000.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_concurrent_adjustments_never_negative() {
    let ledger = ledger().await;
    let player = PlayerId::random();
    ledger.set_balance(player, 100.0).await.unwrap();

    let credits = (0..20).map(|_| {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.add_balance(player, 5.0).await })
    });
    let debits = (0..20).map(|_| {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.remove_balance(player, 30.0).await })
    });
    for outcome in join_all(credits.chain(debits)).await {
        assert!(outcome.unwrap().unwrap() >= 0.0);
    }

    assert!(ledger.get_balance(player).await >= 0.0);
}

// =========================================================================
// After close
// =========================================================================

#[tokio::test]
async fn test_ledger_after_close_degrades() {
    let db = Arc::new(Database::open(&StorageConfig::in_memory()).await.unwrap());
    let ledger = LedgerStore::new(Arc::clone(&db));
    let player = PlayerId::random();
    ledger.set_balance(player, 75.0).await.unwrap();

    db.close().await;

    assert_eq!(ledger.get_balance(player).await, 0.0);
    assert!(matches!(
        ledger.add_balance(player, 1.0).await,
        Err(StorageError::Closed)
    ));
}

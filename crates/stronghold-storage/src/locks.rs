//! Per-key mutual exclusion.
//!
//! SQLite executes each statement atomically, but a read followed by a
//! write is two statements. Two concurrent "add 10 coins" calls for the same
//! player would both read 0 and both write 10. The registry here gives each
//! `(scope, key)` pair its own async mutex so those sequences run one at a
//! time, while calls for different keys never wait on each other.
//!
//! # Memory
//!
//! Entries are created on first use and removed when the last guard (and
//! the last waiter) for that key goes away, so the map only ever holds keys
//! that are currently contended or held.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockKey = (&'static str, String);

/// Registry of per-key async mutexes.
#[derive(Default)]
pub(crate) struct KeyLocks {
    /// The outer std `Mutex` is only held for map bookkeeping, never across
    /// an `.await`.
    entries: Mutex<HashMap<LockKey, Arc<AsyncMutex<()>>>>,
}

impl KeyLocks {
    /// Waits for exclusive access to `key` within `scope`.
    pub(crate) async fn lock(&self, scope: &'static str, key: String) -> KeyGuard<'_> {
        let lock_key = (scope, key);
        let mutex = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(lock_key.clone()).or_default())
        };
        let guard = mutex.lock_owned().await;
        KeyGuard {
            registry: self,
            key: Some(lock_key),
            guard: Some(guard),
        }
    }

    /// Number of keys currently tracked.
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn release(&self, key: LockKey) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        // The map itself holds one reference. Anything above that is another
        // holder or a waiter that cloned the Arc under this same std mutex.
        if entries.get(&key).is_some_and(|m| Arc::strong_count(m) == 1) {
            entries.remove(&key);
        }
    }
}

/// Exclusive access to one key. Released on drop.
pub struct KeyGuard<'a> {
    registry: &'a KeyLocks,
    key: Option<LockKey>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so our Arc reference is gone before pruning.
        drop(self.guard.take());
        if let Some(key) = self.key.take() {
            self.registry.release(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_lock_same_key_serializes() {
        let locks = KeyLocks::default();
        let first = locks.lock("ledger", "a".into()).await;

        // A second lock on the same key must not resolve while `first` lives.
        let second = tokio::time::timeout(
            Duration::from_millis(50),
            locks.lock("ledger", "a".into()),
        )
        .await;
        assert!(second.is_err(), "same key should block");

        drop(first);
        let _third = locks.lock("ledger", "a".into()).await;
    }

    #[tokio::test]
    async fn test_lock_different_keys_do_not_block() {
        let locks = KeyLocks::default();
        let _a = locks.lock("ledger", "a".into()).await;

        let b = tokio::time::timeout(
            Duration::from_millis(50),
            locks.lock("ledger", "b".into()),
        )
        .await;
        assert!(b.is_ok(), "different keys must be independent");
    }

    #[tokio::test]
    async fn test_lock_same_key_different_scope_do_not_block() {
        let locks = KeyLocks::default();
        let _a = locks.lock("ledger", "a".into()).await;

        let b = tokio::time::timeout(
            Duration::from_millis(50),
            locks.lock("homes", "a".into()),
        )
        .await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_release_prunes_idle_entries() {
        let locks = KeyLocks::default();
        {
            let _a = locks.lock("ledger", "a".into()).await;
            let _b = locks.lock("ledger", "b".into()).await;
            assert_eq!(locks.len(), 2);
        }
        assert_eq!(locks.len(), 0);
    }
}

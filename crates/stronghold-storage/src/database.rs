//! The database handle: open, lease, close.
//!
//! # Teardown
//!
//! `close()` must never pull the pool out from under a statement that is
//! already running, and nothing may touch the pool afterwards. A
//! `tokio::sync::RwLock<bool>` acts as the gate:
//!
//! - every operation holds a **read** guard for its whole duration
//!   (inside a [`Lease`]), so any number of operations run concurrently;
//! - `close()` takes the **write** guard, which waits for all leases to be
//!   dropped, flips the flag, and closes the pool;
//! - a lease requested after that sees the flag and gets
//!   [`StorageError::Closed`].
//!
//! Key locks are only reachable through a lease, so the gate is always
//! taken before a key lock. That ordering keeps a queued `close()` from
//! deadlocking against a key holder.

use std::str::FromStr;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
};
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::locks::{KeyGuard, KeyLocks};
use crate::{schema, StorageConfig, StorageError, StorageResult};

/// The single logical handle to durable storage.
///
/// Construct it once at startup and share it (`Arc<Database>`) with every
/// store that needs it. There is no global instance.
pub struct Database {
    pool: SqlitePool,
    /// `true` once closed.
    gate: RwLock<bool>,
    locks: KeyLocks,
}

impl Database {
    /// Opens the database and creates any missing tables.
    ///
    /// Safe to run against an existing database: schema creation is
    /// "create if absent" and never rewrites stored data.
    ///
    /// # Errors
    /// Returns [`StorageError::Unavailable`] if the file cannot be opened
    /// or the schema cannot be created.
    pub async fn open(config: &StorageConfig) -> StorageResult<Self> {
        let options = match &config.path {
            Some(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
            None => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(StorageError::Unavailable)?,
        }
        .busy_timeout(config.busy_timeout());

        // An in-memory database disappears with its last connection, so
        // keep exactly one alive for the life of the pool.
        let mut pool_options =
            SqlitePoolOptions::new().max_connections(config.effective_max_connections());
        if config.path.is_none() {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            tracing::error!(error = %e, "failed to open storage");
            StorageError::Unavailable(e)
        })?;

        for statement in schema::STATEMENTS {
            sqlx::query(statement).execute(&pool).await.map_err(|e| {
                tracing::error!(error = %e, "schema creation failed");
                StorageError::Unavailable(e)
            })?;
        }

        match &config.path {
            Some(path) => tracing::info!(path = %path.display(), "storage opened"),
            None => tracing::info!("in-memory storage opened"),
        }

        Ok(Self {
            pool,
            gate: RwLock::new(false),
            locks: KeyLocks::default(),
        })
    }

    /// Leases the pool for one operation.
    ///
    /// # Errors
    /// Returns [`StorageError::Closed`] after [`close`](Self::close).
    pub async fn acquire(&self) -> StorageResult<Lease<'_>> {
        let gate = self.gate.read().await;
        if *gate {
            return Err(StorageError::Closed);
        }
        Ok(Lease {
            db: self,
            _gate: gate,
        })
    }

    /// Closes the database.
    ///
    /// Waits for in-flight operations to finish, then closes the pool.
    /// Calling it again is a no-op.
    pub async fn close(&self) {
        let mut closed = self.gate.write().await;
        if *closed {
            return;
        }
        *closed = true;
        self.pool.close().await;
        tracing::info!("storage closed");
    }

    /// Returns `true` once [`close`](Self::close) has completed.
    pub async fn is_closed(&self) -> bool {
        *self.gate.read().await
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("pool_size", &self.pool.size())
            .field("locked_keys", &self.locks.len())
            .finish()
    }
}

/// Scoped access to the pool. Holding a lease keeps `close()` waiting.
pub struct Lease<'a> {
    db: &'a Database,
    _gate: RwLockReadGuard<'a, bool>,
}

impl<'a> Lease<'a> {
    /// The connection pool. `&SqlitePool` is an sqlx executor.
    pub fn pool(&self) -> &'a SqlitePool {
        &self.db.pool
    }

    /// Serializes a read-modify-write sequence on one key.
    ///
    /// `scope` separates key spaces (e.g. `"ledger"` vs `"homes"`), so the
    /// same player can hold locks in different stores at once.
    pub async fn lock_key(&self, scope: &'static str, key: impl Into<String>) -> KeyGuard<'a> {
        self.db.locks.lock(scope, key.into()).await
    }
}

//! Storage engine for Stronghold.
//!
//! Every store in the workspace (identity, ledger, location, social, audit)
//! is a thin access pattern over the one [`Database`] defined here. This
//! crate owns:
//!
//! 1. **Lifecycle**: opening the SQLite pool, creating the schema, and
//!    closing it exactly once ([`Database::open`], [`Database::close`]).
//! 2. **Scoped access**: [`Database::acquire`] hands out a [`Lease`] that
//!    keeps teardown from racing in-flight statements.
//! 3. **Per-key serialization**: [`Lease::lock_key`] serializes
//!    read-modify-write sequences for one key without blocking other keys.
//! 4. **Failure policy**: [`StorageError`] and the [`Fallback`] helpers
//!    that turn failed reads into safe defaults.
//!
//! # How it fits in the stack
//!
//! ```text
//! Stores (identity, ledger, location, social, audit)
//!     ↕  Lease (pool + teardown gate + key locks)
//! Storage engine (this crate)
//!     ↕
//! SQLite (sqlx pool)
//! ```

mod config;
mod database;
mod error;
mod fallback;
mod locks;
pub mod schema;

pub use config::StorageConfig;
pub use database::{Database, Lease};
pub use error::{StorageError, StorageResult};
pub use fallback::Fallback;
pub use locks::KeyGuard;

// Stores decode rows themselves; re-exporting sqlx keeps their versions in
// lockstep with the engine's.
pub use sqlx;

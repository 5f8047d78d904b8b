//! # Stronghold
//!
//! Persistence and state core for multiplayer game servers.
//!
//! Stronghold keeps the durable, per-player state a server needs between
//! connections: identities and sessions, bans and mutes, balances, saved
//! positions, relationships, and an audit log of world changes. Each
//! concern is its own store over one shared SQLite [`Database`](prelude::Database);
//! this crate wires them together from a [`CoreConfig`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stronghold::prelude::*;
//!
//! # async fn run() -> Result<(), StrongholdError> {
//! stronghold::init_tracing();
//!
//! let core = Stronghold::builder()
//!     .storage(StorageConfig::file("world.db"))
//!     .open()
//!     .await?;
//!
//! let player = PlayerId::random();
//! core.identity().register(player, "Steve", "argon2-hash", "10.0.0.1").await?;
//! core.ledger().add_balance(player, 25.0).await?;
//!
//! core.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate layout
//!
//! ```text
//! stronghold (this crate)  ← config, wiring, unified error
//!     ↕
//! identity · ledger · location · social · audit  ← one store per concern
//!     ↕
//! stronghold-storage  ← pool, schema, teardown gate, key locks
//!     ↕
//! stronghold-types  ← PlayerId, Timestamp, Location, Restriction, ...
//! ```

mod config;
mod error;
mod instance;
mod telemetry;

pub use config::{CoreConfig, FeatureFlags};
pub use error::StrongholdError;
pub use instance::{Stronghold, StrongholdBuilder};
pub use telemetry::init_tracing;

/// Everything needed to use Stronghold, in one import.
pub mod prelude {
    pub use crate::{CoreConfig, FeatureFlags, Stronghold, StrongholdBuilder, StrongholdError};

    pub use stronghold_audit::{AuditRecord, AuditStore, NEAR_QUERY_LIMIT};
    pub use stronghold_identity::{IdentityConfig, IdentityRecord, IdentityStore};
    pub use stronghold_ledger::{Debit, LedgerStore};
    pub use stronghold_location::{Home, HomeWrite, LocationError, LocationStore};
    pub use stronghold_social::SocialStore;
    pub use stronghold_storage::{Database, Fallback, StorageConfig, StorageError, StorageResult};
    pub use stronghold_types::{
        AuditAction, BlockPos, Expiry, Gender, Location, Orientation, PlayerId, Position,
        Restriction, RestrictionKind, Timestamp,
    };
}

//! Storage configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the database lives and how the connection pool behaves.
///
/// Sensible defaults are provided; callers usually only change `path`.
/// `#[serde(default)]` lets a partial config file fill in the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file. `None` keeps everything in memory for the lifetime
    /// of the process (tests and tooling).
    pub path: Option<PathBuf>,

    /// Upper bound on pooled connections. In-memory databases always use
    /// exactly one, since every SQLite memory connection is its own
    /// private database.
    pub max_connections: u32,

    /// How long a statement waits on SQLite's file lock before failing.
    pub busy_timeout_ms: u64,
}

impl StorageConfig {
    /// A file-backed database at `path`, other settings default.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// A private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            max_connections: 1,
            ..Self::default()
        }
    }

    pub(crate) fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub(crate) fn effective_max_connections(&self) -> u32 {
        match self.path {
            Some(_) => self.max_connections.max(1),
            None => 1,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("stronghold.db")),
            max_connections: 4,
            busy_timeout_ms: 5_000,
        }
    }
}

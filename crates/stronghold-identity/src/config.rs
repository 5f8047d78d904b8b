//! Identity store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Values the identity store needs from the caller's configuration.
///
/// The store never reads configuration files itself; whoever builds the
/// store passes these in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Balance a player's ledger entry is seeded with on registration.
    ///
    /// Default: 100. Negative values are clamped to 0.
    pub starting_balance: f64,

    /// How long (in seconds) an issued session stays valid.
    ///
    /// Default: 12 hours.
    pub session_ttl_secs: u64,
}

impl IdentityConfig {
    /// The session TTL as a [`Duration`].
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            starting_balance: 100.0,
            session_ttl_secs: 12 * 60 * 60,
        }
    }
}

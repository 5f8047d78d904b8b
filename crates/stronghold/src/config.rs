//! Top-level configuration.
//!
//! Stronghold never reads configuration files on its own. The host server
//! builds a [`CoreConfig`] (or deserializes one, e.g. from the JSON section
//! of its own config) and hands it to the builder.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stronghold_identity::IdentityConfig;
use stronghold_storage::StorageConfig;

use crate::StrongholdError;

/// Everything the core needs from the host at startup.
///
/// Missing fields fall back to their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub storage: StorageConfig,

    /// Balance new registrations start with. Default: 100.
    pub starting_balance: f64,

    /// Homes a player may hold when the host has no per-player rule.
    /// Default: 3.
    pub default_home_quota: u32,

    /// How long (in seconds) an issued session stays valid.
    ///
    /// Default: 12 hours.
    pub session_ttl_secs: u64,

    pub features: FeatureFlags,
}

impl CoreConfig {
    /// Parses a JSON config. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, StrongholdError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub(crate) fn identity(&self) -> IdentityConfig {
        IdentityConfig {
            starting_balance: self.starting_balance,
            session_ttl_secs: self.session_ttl_secs,
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        let identity = IdentityConfig::default();
        Self {
            storage: StorageConfig::default(),
            starting_balance: identity.starting_balance,
            default_home_quota: 3,
            session_ttl_secs: identity.session_ttl_secs,
            features: FeatureFlags::default(),
        }
    }
}

/// Optional subsystems. All on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Registration and sessions.
    pub auth: bool,
    /// The world audit log.
    pub logs: bool,
    /// The gender profile attribute.
    pub gender: bool,
    /// The social graph.
    pub friends: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            auth: true,
            logs: true,
            gender: true,
            friends: true,
        }
    }
}

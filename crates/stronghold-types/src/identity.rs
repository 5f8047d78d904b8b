//! Player identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TypeError;

/// A stable, globally unique identifier for a player.
///
/// This is a "newtype wrapper" around a [`Uuid`]. The identity never
/// changes when the player renames themselves, so every table keys on it
/// rather than on the display name.
///
/// `#[serde(transparent)]` serializes a `PlayerId` as the bare UUID
/// string, which is also exactly what we write into `TEXT` columns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a fresh random identity (UUID v4).
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

/// Display prints the canonical hyphenated UUID. This is the form stored
/// in the database, so `to_string()` doubles as the column encoding.
impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for PlayerId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TypeError::InvalidPlayerId(s.to_string()))
    }
}

impl From<Uuid> for PlayerId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

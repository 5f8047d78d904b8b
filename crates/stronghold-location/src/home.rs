//! Home records and row decoding shared by homes and spawn.

use serde::{Deserialize, Serialize};
use stronghold_storage::sqlx::{self, sqlite::SqliteRow, Row};
use stronghold_types::{Location, Orientation, Position};

/// A named home belonging to one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Home {
    pub name: String,
    pub location: Location,
}

/// What a home write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeWrite {
    /// The name was new.
    Created,
    /// An existing home with the same name was overwritten.
    Replaced,
}

/// Decodes `world, x, y, z, yaw, pitch`.
pub(crate) fn location_from_row(row: &SqliteRow) -> Result<Location, sqlx::Error> {
    Ok(Location::new(
        row.try_get::<String, _>("world")?,
        Position::new(row.try_get("x")?, row.try_get("y")?, row.try_get("z")?),
        Orientation::new(row.try_get("yaw")?, row.try_get("pitch")?),
    ))
}

pub(crate) fn home_from_row(row: &SqliteRow) -> Result<Home, sqlx::Error> {
    Ok(Home {
        name: row.try_get("name")?,
        location: location_from_row(row)?,
    })
}

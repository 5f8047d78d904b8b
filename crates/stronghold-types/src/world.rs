//! World coordinates: precise positions for bookmarks, block positions for
//! audit events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A precise point in a world.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Which way an entity is facing, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Orientation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }
}

/// A full bookmark target: which world, where, and facing which way.
///
/// Homes and the global spawn both store exactly this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Opaque world identifier (e.g. `"overworld"`).
    pub world: String,
    pub position: Position,
    pub orientation: Orientation,
}

impl Location {
    pub fn new(
        world: impl Into<String>,
        position: Position,
        orientation: Orientation,
    ) -> Self {
        Self {
            world: world.into(),
            position,
            orientation,
        }
    }
}

/// An integer block coordinate. Audit events are recorded and queried at
/// exact block positions, never by distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

use serde::{Deserialize, Serialize};
use stronghold_storage::sqlx::{sqlite::SqliteRow, Row};
use stronghold_storage::StorageResult;
use stronghold_types::{AuditAction, BlockPos, PlayerId, Timestamp};

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Insertion order. Breaks ties between records with the same timestamp.
    pub id: i64,
    pub player: PlayerId,
    pub action: AuditAction,
    pub world: String,
    pub pos: BlockPos,
    /// What was affected, e.g. a block or entity type name.
    pub object_kind: String,
    pub recorded_at: Timestamp,
}

impl AuditRecord {
    pub(crate) fn from_row(row: &SqliteRow) -> StorageResult<Self> {
        let player: String = row.try_get("player_id")?;
        let action: String = row.try_get("action")?;
        Ok(Self {
            id: row.try_get("id")?,
            player: player.parse()?,
            action: AuditAction::from(action.as_str()),
            world: row.try_get("world")?,
            pos: BlockPos::new(row.try_get("x")?, row.try_get("y")?, row.try_get("z")?),
            object_kind: row.try_get("object_kind")?,
            recorded_at: Timestamp::from_millis(row.try_get("recorded_at")?),
        })
    }
}

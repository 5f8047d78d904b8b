use std::sync::Arc;

use stronghold_storage::sqlx;
use stronghold_storage::{Database, Fallback, StorageResult};
use stronghold_types::{AuditAction, BlockPos, PlayerId, Timestamp};

use crate::AuditRecord;

/// How many records [`AuditStore::query_near`] returns at most.
pub const NEAR_QUERY_LIMIT: u32 = 10;

/// Access to the `audit_log` table.
#[derive(Debug, Clone)]
pub struct AuditStore {
    db: Arc<Database>,
}

impl AuditStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Appends one record stamped with the current time and returns its id.
    ///
    /// A single INSERT: the record is either written whole or not at all.
    pub async fn append(
        &self,
        player: PlayerId,
        action: AuditAction,
        world: &str,
        pos: BlockPos,
        object_kind: &str,
    ) -> StorageResult<i64> {
        self.try_append(player, &action, world, pos, object_kind)
            .await
            .logged("append")
    }

    async fn try_append(
        &self,
        player: PlayerId,
        action: &AuditAction,
        world: &str,
        pos: BlockPos,
        object_kind: &str,
    ) -> StorageResult<i64> {
        let lease = self.db.acquire().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO audit_log (player_id, action, world, x, y, z, object_kind, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(player.to_string())
        .bind(action.as_str())
        .bind(world)
        .bind(pos.x)
        .bind(pos.y)
        .bind(pos.z)
        .bind(object_kind)
        .bind(Timestamp::now().as_millis())
        .execute(lease.pool())
        .await?;

        let id = result.last_insert_rowid();
        tracing::trace!(%player, %action, world, %pos, id, "audit record appended");
        Ok(id)
    }

    /// The most recent [`NEAR_QUERY_LIMIT`] records at exactly `pos`,
    /// newest first.
    pub async fn query_near(&self, world: &str, pos: BlockPos) -> Vec<AuditRecord> {
        self.recent_at(world, pos, NEAR_QUERY_LIMIT).await
    }

    /// The most recent `limit` records at exactly `pos`, newest first.
    ///
    /// Records with equal timestamps are ordered by insertion, later first.
    pub async fn recent_at(&self, world: &str, pos: BlockPos, limit: u32) -> Vec<AuditRecord> {
        self.try_recent_at(world, pos, limit)
            .await
            .or_default_logged("recent_at")
    }

    async fn try_recent_at(
        &self,
        world: &str,
        pos: BlockPos,
        limit: u32,
    ) -> StorageResult<Vec<AuditRecord>> {
        let lease = self.db.acquire().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, player_id, action, world, x, y, z, object_kind, recorded_at
              FROM audit_log
             WHERE world = ?1 AND x = ?2 AND y = ?3 AND z = ?4
             ORDER BY recorded_at DESC, id DESC
             LIMIT ?5
            "#,
        )
        .bind(world)
        .bind(pos.x)
        .bind(pos.y)
        .bind(pos.z)
        .bind(i64::from(limit))
        .fetch_all(lease.pool())
        .await?;

        rows.iter().map(AuditRecord::from_row).collect()
    }
}

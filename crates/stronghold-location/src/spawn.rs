//! The global spawn point.
//!
//! The `spawn` table's key is pinned to 1 by a CHECK constraint, so every
//! write is an upsert of the same row and a second row cannot exist.

use stronghold_storage::sqlx;
use stronghold_storage::{Fallback, StorageResult};
use stronghold_types::Location;

use crate::home::location_from_row;
use crate::LocationStore;

impl LocationStore {
    /// Replaces the spawn point.
    pub async fn set_spawn(&self, location: &Location) -> StorageResult<()> {
        self.try_set_spawn(location).await.logged("set_spawn")
    }

    async fn try_set_spawn(&self, location: &Location) -> StorageResult<()> {
        let lease = self.db.acquire().await?;
        sqlx::query(
            r#"
            INSERT INTO spawn (id, world, x, y, z, yaw, pitch)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (id) DO UPDATE SET
                world = excluded.world,
                x     = excluded.x,
                y     = excluded.y,
                z     = excluded.z,
                yaw   = excluded.yaw,
                pitch = excluded.pitch
            "#,
        )
        .bind(&location.world)
        .bind(location.position.x)
        .bind(location.position.y)
        .bind(location.position.z)
        .bind(location.orientation.yaw)
        .bind(location.orientation.pitch)
        .execute(lease.pool())
        .await?;
        tracing::info!(world = %location.world, "spawn point set");
        Ok(())
    }

    /// The spawn point, or `None` before it was first set.
    pub async fn get_spawn(&self) -> Option<Location> {
        self.try_get_spawn().await.or_default_logged("get_spawn")
    }

    async fn try_get_spawn(&self) -> StorageResult<Option<Location>> {
        let lease = self.db.acquire().await?;
        let row = sqlx::query("SELECT world, x, y, z, yaw, pitch FROM spawn WHERE id = 1")
            .fetch_optional(lease.pool())
            .await?;
        Ok(row.as_ref().map(location_from_row).transpose()?)
    }
}

//! Per-player homes.

use std::sync::Arc;

use stronghold_storage::sqlx;
use stronghold_storage::{Database, Fallback, Lease, StorageError, StorageResult};
use stronghold_types::{Location, PlayerId};

use crate::home::home_from_row;
use crate::{Home, HomeWrite, LocationError};

const LOCK_SCOPE: &str = "homes";

/// Access to the `homes` and `spawn` tables.
#[derive(Debug, Clone)]
pub struct LocationStore {
    pub(crate) db: Arc<Database>,
}

impl LocationStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Saves `location` under `name`, replacing any home of that name.
    pub async fn set_home(
        &self,
        player: PlayerId,
        name: &str,
        location: &Location,
    ) -> StorageResult<HomeWrite> {
        self.try_set_home(player, name, location)
            .await
            .logged("set_home")
    }

    async fn try_set_home(
        &self,
        player: PlayerId,
        name: &str,
        location: &Location,
    ) -> StorageResult<HomeWrite> {
        let lease = self.db.acquire().await?;
        let _key = lease.lock_key(LOCK_SCOPE, player.to_string()).await;
        let existed = home_exists(&lease, player, name).await?;
        upsert_home(&lease, player, name, location).await?;
        Ok(if existed {
            HomeWrite::Replaced
        } else {
            HomeWrite::Created
        })
    }

    /// Like [`set_home`](Self::set_home), but refuses to create a new name
    /// once the player holds `quota` homes. Replacing an existing name is
    /// always allowed.
    ///
    /// The count and the write happen under the player's key lock, so two
    /// concurrent writes cannot both slip under the quota.
    ///
    /// # Errors
    /// [`LocationError::QuotaExceeded`] if the write would exceed `quota`.
    pub async fn set_home_within_quota(
        &self,
        player: PlayerId,
        name: &str,
        location: &Location,
        quota: u32,
    ) -> Result<HomeWrite, LocationError> {
        let result = self
            .try_set_home_within_quota(player, name, location, quota)
            .await;
        match &result {
            Err(LocationError::QuotaExceeded { quota, count }) => {
                tracing::debug!(%player, home = name, quota, count, "home quota reached");
            }
            Err(LocationError::Storage(StorageError::Closed)) => {
                tracing::warn!(op = "set_home_within_quota", "storage used after close");
            }
            Err(LocationError::Storage(e)) => {
                tracing::error!(op = "set_home_within_quota", error = %e, "storage operation failed");
            }
            Ok(_) => {}
        }
        result
    }

    async fn try_set_home_within_quota(
        &self,
        player: PlayerId,
        name: &str,
        location: &Location,
        quota: u32,
    ) -> Result<HomeWrite, LocationError> {
        let lease = self.db.acquire().await?;
        let _key = lease.lock_key(LOCK_SCOPE, player.to_string()).await;

        if home_exists(&lease, player, name).await? {
            upsert_home(&lease, player, name, location).await?;
            return Ok(HomeWrite::Replaced);
        }

        let held = count(&lease, player).await?;
        if held >= quota {
            return Err(LocationError::QuotaExceeded { quota, count: held });
        }
        upsert_home(&lease, player, name, location).await?;
        Ok(HomeWrite::Created)
    }

    /// The home called `name`, or `None`.
    pub async fn get_home(&self, player: PlayerId, name: &str) -> Option<Home> {
        self.try_get_home(player, name)
            .await
            .or_default_logged("get_home")
    }

    async fn try_get_home(&self, player: PlayerId, name: &str) -> StorageResult<Option<Home>> {
        let lease = self.db.acquire().await?;
        let row = sqlx::query(
            "SELECT name, world, x, y, z, yaw, pitch FROM homes WHERE player_id = ?1 AND name = ?2",
        )
        .bind(player.to_string())
        .bind(name)
        .fetch_optional(lease.pool())
        .await?;
        Ok(row.as_ref().map(home_from_row).transpose()?)
    }

    /// All of the player's homes, sorted by name.
    pub async fn list_homes(&self, player: PlayerId) -> Vec<Home> {
        self.try_list_homes(player)
            .await
            .or_default_logged("list_homes")
    }

    async fn try_list_homes(&self, player: PlayerId) -> StorageResult<Vec<Home>> {
        let lease = self.db.acquire().await?;
        let rows = sqlx::query(
            "SELECT name, world, x, y, z, yaw, pitch FROM homes WHERE player_id = ?1 ORDER BY name",
        )
        .bind(player.to_string())
        .fetch_all(lease.pool())
        .await?;
        Ok(rows.iter().map(home_from_row).collect::<Result<_, _>>()?)
    }

    /// How many homes the player holds. 0 on failure.
    pub async fn count_homes(&self, player: PlayerId) -> u32 {
        self.try_count_homes(player)
            .await
            .or_default_logged("count_homes")
    }

    async fn try_count_homes(&self, player: PlayerId) -> StorageResult<u32> {
        let lease = self.db.acquire().await?;
        count(&lease, player).await
    }

    /// Deletes the home called `name`. Returns `false` if there was none,
    /// which is not an error.
    pub async fn delete_home(&self, player: PlayerId, name: &str) -> StorageResult<bool> {
        self.try_delete_home(player, name)
            .await
            .logged("delete_home")
    }

    async fn try_delete_home(&self, player: PlayerId, name: &str) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let _key = lease.lock_key(LOCK_SCOPE, player.to_string()).await;
        let result = sqlx::query("DELETE FROM homes WHERE player_id = ?1 AND name = ?2")
            .bind(player.to_string())
            .bind(name)
            .execute(lease.pool())
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(%player, home = name, "home deleted");
        }
        Ok(deleted)
    }
}

async fn home_exists(lease: &Lease<'_>, player: PlayerId, name: &str) -> StorageResult<bool> {
    let row = sqlx::query("SELECT 1 FROM homes WHERE player_id = ?1 AND name = ?2")
        .bind(player.to_string())
        .bind(name)
        .fetch_optional(lease.pool())
        .await?;
    Ok(row.is_some())
}

async fn count(lease: &Lease<'_>, player: PlayerId) -> StorageResult<u32> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM homes WHERE player_id = ?1")
        .bind(player.to_string())
        .fetch_one(lease.pool())
        .await?;
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

async fn upsert_home(
    lease: &Lease<'_>,
    player: PlayerId,
    name: &str,
    location: &Location,
) -> StorageResult<()> {
    sqlx::query(
        r#"
        INSERT INTO homes (player_id, name, world, x, y, z, yaw, pitch)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT (player_id, name) DO UPDATE SET
            world = excluded.world,
            x     = excluded.x,
            y     = excluded.y,
            z     = excluded.z,
            yaw   = excluded.yaw,
            pitch = excluded.pitch
        "#,
    )
    .bind(player.to_string())
    .bind(name)
    .bind(&location.world)
    .bind(location.position.x)
    .bind(location.position.y)
    .bind(location.position.z)
    .bind(location.orientation.yaw)
    .bind(location.orientation.pitch)
    .execute(lease.pool())
    .await?;
    tracing::debug!(%player, home = name, world = %location.world, "home saved");
    Ok(())
}

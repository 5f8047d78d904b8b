use std::sync::Arc;

use stronghold_storage::sqlx::{self, Sqlite, SqliteConnection};
use stronghold_storage::{Database, Fallback, StorageResult};
use stronghold_types::{PlayerId, Timestamp};

/// Access to the `relationships` table.
#[derive(Debug, Clone)]
pub struct SocialStore {
    db: Arc<Database>,
}

impl SocialStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    // =====================================================================
    // Directed edges
    // =====================================================================

    /// Creates the edge `from → to`.
    ///
    /// Returns `false` if it already existed; re-adding is a no-op and
    /// keeps the original creation time.
    pub async fn add_relationship(&self, from: PlayerId, to: PlayerId) -> StorageResult<bool> {
        self.try_add_relationship(from, to)
            .await
            .logged("add_relationship")
    }

    async fn try_add_relationship(&self, from: PlayerId, to: PlayerId) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let mut conn = lease.pool().acquire().await?;
        let added = insert_edge(&mut conn, from, to, Timestamp::now()).await?;
        if added {
            tracing::debug!(%from, %to, "relationship added");
        }
        Ok(added)
    }

    /// Deletes the edge `from → to`. Returns `false` if it did not exist.
    pub async fn remove_relationship(&self, from: PlayerId, to: PlayerId) -> StorageResult<bool> {
        self.try_remove_relationship(from, to)
            .await
            .logged("remove_relationship")
    }

    async fn try_remove_relationship(&self, from: PlayerId, to: PlayerId) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let mut conn = lease.pool().acquire().await?;
        let removed = delete_edge(&mut conn, from, to).await?;
        if removed {
            tracing::debug!(%from, %to, "relationship removed");
        }
        Ok(removed)
    }

    /// Checks the directed edge `from → to` only.
    pub async fn has_relationship(&self, from: PlayerId, to: PlayerId) -> bool {
        self.try_has_relationship(from, to)
            .await
            .or_fallback("has_relationship", false)
    }

    async fn try_has_relationship(&self, from: PlayerId, to: PlayerId) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let row = sqlx::query("SELECT 1 FROM relationships WHERE player_id = ?1 AND other_id = ?2")
            .bind(from.to_string())
            .bind(to.to_string())
            .fetch_optional(lease.pool())
            .await?;
        Ok(row.is_some())
    }

    /// Everyone `from` points to, oldest edge first.
    pub async fn list_relationships(&self, from: PlayerId) -> Vec<PlayerId> {
        self.try_list_relationships(from)
            .await
            .or_default_logged("list_relationships")
    }

    async fn try_list_relationships(&self, from: PlayerId) -> StorageResult<Vec<PlayerId>> {
        let lease = self.db.acquire().await?;
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT other_id FROM relationships WHERE player_id = ?1 ORDER BY created_at, other_id",
        )
        .bind(from.to_string())
        .fetch_all(lease.pool())
        .await?;

        let mut players: Vec<PlayerId> = Vec::with_capacity(ids.len());
        for id in ids {
            players.push(id.parse()?);
        }
        Ok(players)
    }

    // =====================================================================
    // Mutual edges
    // =====================================================================

    /// Creates both `a → b` and `b → a` in one transaction.
    ///
    /// Returns `true` if either edge was new.
    pub async fn add_mutual(&self, a: PlayerId, b: PlayerId) -> StorageResult<bool> {
        self.try_add_mutual(a, b).await.logged("add_mutual")
    }

    async fn try_add_mutual(&self, a: PlayerId, b: PlayerId) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let now = Timestamp::now();
        let mut tx = lease.pool().begin().await?;
        let forward = insert_edge(&mut tx, a, b, now).await?;
        let backward = insert_edge(&mut tx, b, a, now).await?;
        tx.commit().await?;

        let added = forward || backward;
        if added {
            tracing::debug!(%a, %b, "mutual relationship added");
        }
        Ok(added)
    }

    /// Deletes both `a → b` and `b → a` in one transaction.
    ///
    /// Returns `true` if either edge existed.
    pub async fn remove_mutual(&self, a: PlayerId, b: PlayerId) -> StorageResult<bool> {
        self.try_remove_mutual(a, b).await.logged("remove_mutual")
    }

    async fn try_remove_mutual(&self, a: PlayerId, b: PlayerId) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let mut tx = lease.pool().begin().await?;
        let forward = delete_edge(&mut tx, a, b).await?;
        let backward = delete_edge(&mut tx, b, a).await?;
        tx.commit().await?;

        let removed = forward || backward;
        if removed {
            tracing::debug!(%a, %b, "mutual relationship removed");
        }
        Ok(removed)
    }
}

async fn insert_edge(
    conn: &mut SqliteConnection,
    from: PlayerId,
    to: PlayerId,
    at: Timestamp,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query::<Sqlite>(
        r#"
        INSERT INTO relationships (player_id, other_id, created_at) VALUES (?1, ?2, ?3)
        ON CONFLICT (player_id, other_id) DO NOTHING
        "#,
    )
    .bind(from.to_string())
    .bind(to.to_string())
    .bind(at.as_millis())
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

async fn delete_edge(
    conn: &mut SqliteConnection,
    from: PlayerId,
    to: PlayerId,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query::<Sqlite>("DELETE FROM relationships WHERE player_id = ?1 AND other_id = ?2")
            .bind(from.to_string())
            .bind(to.to_string())
            .execute(conn)
            .await?;
    Ok(result.rows_affected() > 0)
}

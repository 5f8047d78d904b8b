//! Session records: who authenticated, from where, until when.
//!
//! A session is a single row per player. Issuing a new one replaces the old
//! one, so "at most one live session per identity" is the table's primary
//! key rather than something we have to check.
//!
//! ```text
//! issue_session() ──→ [valid while now < expires_at && origin matches]
//!       │                             │
//!       └── issue again: replaced ────┘── revoke_session(): gone
//! ```
//!
//! Validity is never renewed implicitly. Checking a session does not extend
//! it; only issuing a new one does.

use std::time::Duration;

use stronghold_storage::sqlx;
use stronghold_storage::{Fallback, StorageResult};
use stronghold_types::{PlayerId, Timestamp};

use crate::IdentityStore;

impl IdentityStore {
    /// Stores a session for `player` from `origin`, valid for `ttl`.
    ///
    /// Replaces any earlier session for the player. Returns the expiry
    /// instant that was stored.
    pub async fn issue_session(
        &self,
        player: PlayerId,
        origin: &str,
        ttl: Duration,
    ) -> StorageResult<Timestamp> {
        self.try_issue_session(player, origin, ttl)
            .await
            .logged("issue_session")
    }

    async fn try_issue_session(
        &self,
        player: PlayerId,
        origin: &str,
        ttl: Duration,
    ) -> StorageResult<Timestamp> {
        let lease = self.db.acquire().await?;
        let expires_at = Timestamp::now() + ttl;

        sqlx::query(
            r#"
            INSERT INTO sessions (player_id, origin, expires_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (player_id) DO UPDATE SET
                origin     = excluded.origin,
                expires_at = excluded.expires_at
            "#,
        )
        .bind(player.to_string())
        .bind(origin)
        .bind(expires_at.as_millis())
        .execute(lease.pool())
        .await?;

        tracing::debug!(%player, origin, %expires_at, "session issued");
        Ok(expires_at)
    }

    /// Returns `true` if `player` holds a session issued to exactly
    /// `origin` whose expiry is still strictly in the future.
    pub async fn has_valid_session(&self, player: PlayerId, origin: &str) -> bool {
        self.try_has_valid_session(player, origin)
            .await
            .or_fallback("has_valid_session", false)
    }

    async fn try_has_valid_session(&self, player: PlayerId, origin: &str) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let expires_at: Option<i64> = sqlx::query_scalar(
            "SELECT expires_at FROM sessions WHERE player_id = ?1 AND origin = ?2",
        )
        .bind(player.to_string())
        .bind(origin)
        .fetch_optional(lease.pool())
        .await?;

        Ok(expires_at
            .map(Timestamp::from_millis)
            .is_some_and(|at| Timestamp::now() < at))
    }

    /// Deletes the player's session (logout). Returns `true` if one existed.
    pub async fn revoke_session(&self, player: PlayerId) -> StorageResult<bool> {
        self.try_revoke_session(player)
            .await
            .logged("revoke_session")
    }

    async fn try_revoke_session(&self, player: PlayerId) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let result = sqlx::query("DELETE FROM sessions WHERE player_id = ?1")
            .bind(player.to_string())
            .execute(lease.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Ban and mute lifecycle.
//!
//! Both restrictions run the same [`Restriction`] automaton over their own
//! three columns of the `players` row. Nothing sweeps expired restrictions
//! in the background: the next read that sees a passed expiry clears the row
//! and reports `Clear`. Code that wants to react to an expiry (announce an
//! unban, say) has to ask.
//!
//! The clearing write is a compare-and-set: it only fires if the row still
//! holds an expired restriction. A ban applied between our read and our
//! write therefore survives.

use stronghold_storage::sqlx::{self, Row};
use stronghold_storage::{Fallback, Lease, StorageResult};
use stronghold_types::{Expiry, PlayerId, Restriction, RestrictionKind, Timestamp};

use crate::IdentityStore;

/// The columns one restriction kind occupies.
#[derive(Clone, Copy)]
struct Columns {
    flag: &'static str,
    reason: &'static str,
    until: &'static str,
}

impl Columns {
    fn of(kind: RestrictionKind) -> Self {
        match kind {
            RestrictionKind::Ban => Self {
                flag: "is_banned",
                reason: "ban_reason",
                until: "ban_until",
            },
            RestrictionKind::Mute => Self {
                flag: "is_muted",
                reason: "mute_reason",
                until: "mute_until",
            },
        }
    }
}

impl IdentityStore {
    /// Moves the player to `Restricted(reason, expires)`.
    ///
    /// Overwrites any restriction of the same kind already in place.
    /// Returns `false` if the player has no identity record.
    pub async fn restrict(
        &self,
        player: PlayerId,
        kind: RestrictionKind,
        reason: Option<&str>,
        expires: Expiry,
    ) -> StorageResult<bool> {
        self.try_restrict(player, kind, reason, expires)
            .await
            .logged("restrict")
    }

    async fn try_restrict(
        &self,
        player: PlayerId,
        kind: RestrictionKind,
        reason: Option<&str>,
        expires: Expiry,
    ) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let cols = Columns::of(kind);
        let sql = format!(
            "UPDATE players SET {} = 1, {} = ?1, {} = ?2 WHERE player_id = ?3",
            cols.flag, cols.reason, cols.until
        );
        let result = sqlx::query(&sql)
            .bind(reason)
            .bind(expires.to_column())
            .bind(player.to_string())
            .execute(lease.pool())
            .await?;

        let applied = result.rows_affected() > 0;
        if applied {
            tracing::info!(%player, %kind, %expires, reason, "restriction applied");
        }
        Ok(applied)
    }

    /// Moves the player back to `Clear`.
    ///
    /// Returns `true` if a restriction was actually lifted.
    pub async fn lift(&self, player: PlayerId, kind: RestrictionKind) -> StorageResult<bool> {
        self.try_lift(player, kind).await.logged("lift")
    }

    async fn try_lift(&self, player: PlayerId, kind: RestrictionKind) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let cols = Columns::of(kind);
        let sql = format!(
            "UPDATE players SET {flag} = 0, {} = NULL, {} = NULL WHERE player_id = ?1 AND {flag} = 1",
            cols.reason,
            cols.until,
            flag = cols.flag,
        );
        let result = sqlx::query(&sql)
            .bind(player.to_string())
            .execute(lease.pool())
            .await?;

        let lifted = result.rows_affected() > 0;
        if lifted {
            tracing::info!(%player, %kind, "restriction lifted");
        }
        Ok(lifted)
    }

    /// Returns `true` if the player is currently restricted.
    ///
    /// If the stored restriction has expired, clears it as a side effect
    /// and returns `false`. On failure, reports `false`.
    pub async fn is_restricted(&self, player: PlayerId, kind: RestrictionKind) -> bool {
        self.restriction(player, kind).await.is_restricted()
    }

    /// The current restriction state, with the same lazy expiry as
    /// [`is_restricted`](Self::is_restricted). Unknown players are `Clear`.
    pub async fn restriction(&self, player: PlayerId, kind: RestrictionKind) -> Restriction {
        self.try_restriction(player, kind)
            .await
            .or_default_logged("restriction")
    }

    /// Shorthand for the reason of an active ban.
    pub async fn ban_reason(&self, player: PlayerId) -> Option<String> {
        self.restriction(player, RestrictionKind::Ban)
            .await
            .reason()
            .map(str::to_string)
    }

    async fn try_restriction(
        &self,
        player: PlayerId,
        kind: RestrictionKind,
    ) -> StorageResult<Restriction> {
        let lease = self.db.acquire().await?;
        let cols = Columns::of(kind);

        let stored = read_restriction(&lease, player, cols).await?;
        let now = Timestamp::now();
        if !stored.is_expired_at(now) {
            return Ok(stored);
        }

        let sql = format!(
            "UPDATE players SET {flag} = 0, {reason} = NULL, {until} = NULL \
             WHERE player_id = ?1 AND {flag} = 1 AND {until} IS NOT NULL AND {until} <= ?2",
            flag = cols.flag,
            reason = cols.reason,
            until = cols.until,
        );
        let result = sqlx::query(&sql)
            .bind(player.to_string())
            .bind(now.as_millis())
            .execute(lease.pool())
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!(%player, %kind, "restriction expired");
            return Ok(Restriction::Clear);
        }

        // Someone lifted or re-applied it between our read and write.
        let current = read_restriction(&lease, player, cols).await?;
        if current.is_expired_at(now) {
            Ok(Restriction::Clear)
        } else {
            Ok(current)
        }
    }
}

async fn read_restriction(
    lease: &Lease<'_>,
    player: PlayerId,
    cols: Columns,
) -> StorageResult<Restriction> {
    let sql = format!(
        "SELECT {} AS active, {} AS reason, {} AS until FROM players WHERE player_id = ?1",
        cols.flag, cols.reason, cols.until
    );
    let row = sqlx::query(&sql)
        .bind(player.to_string())
        .fetch_optional(lease.pool())
        .await?;

    match row {
        Some(row) => Ok(Restriction::from_columns(
            row.try_get("active")?,
            row.try_get("reason")?,
            row.try_get("until")?,
        )),
        None => Ok(Restriction::Clear),
    }
}

//! The identity store: registration, credentials, and profile.
//!
//! Sessions and restrictions live in their own modules as further `impl`
//! blocks on the same [`IdentityStore`].

use std::sync::Arc;

use stronghold_storage::sqlx::{self, sqlite::SqliteRow, Row};
use stronghold_storage::{Database, Fallback, StorageResult};
use stronghold_types::{Gender, PlayerId, Restriction, Timestamp};

use crate::{IdentityConfig, IdentityRecord};

/// Access to the `players` and `sessions` tables.
///
/// Cheap to clone; every clone shares the same [`Database`].
#[derive(Debug, Clone)]
pub struct IdentityStore {
    pub(crate) db: Arc<Database>,
    pub(crate) config: IdentityConfig,
}

impl IdentityStore {
    pub fn new(db: Arc<Database>, config: IdentityConfig) -> Self {
        Self { db, config }
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    // =====================================================================
    // Registration
    // =====================================================================

    /// Registers a player, or re-registers an existing one.
    ///
    /// Upserts the identity record (display name, credential hash, origin,
    /// registration time) and seeds the ledger with the configured starting
    /// balance, both in one transaction. This is the only place ledger
    /// entries come into existence.
    ///
    /// Re-registration overwrites the credential and origin but keeps the
    /// rest of the record (restrictions, gender, last login), and does not
    /// reset an existing balance: the seed is insert-if-absent.
    pub async fn register(
        &self,
        player: PlayerId,
        display_name: &str,
        credential_hash: &str,
        origin: &str,
    ) -> StorageResult<()> {
        self.try_register(player, display_name, credential_hash, origin)
            .await
            .logged("register")
    }

    async fn try_register(
        &self,
        player: PlayerId,
        display_name: &str,
        credential_hash: &str,
        origin: &str,
    ) -> StorageResult<()> {
        let lease = self.db.acquire().await?;
        let key = player.to_string();
        let now = Timestamp::now();

        let mut tx = lease.pool().begin().await?;
        sqlx::query(
            r#"
            INSERT INTO players (player_id, display_name, credential_hash, last_origin, registered_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (player_id) DO UPDATE SET
                display_name    = excluded.display_name,
                credential_hash = excluded.credential_hash,
                last_origin     = excluded.last_origin,
                registered_at   = excluded.registered_at
            "#,
        )
        .bind(&key)
        .bind(display_name)
        .bind(credential_hash)
        .bind(origin)
        .bind(now.as_millis())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO balances (player_id, balance) VALUES (?1, ?2) ON CONFLICT (player_id) DO NOTHING",
        )
        .bind(&key)
        .bind(self.config.starting_balance.max(0.0))
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(%player, display_name, "player registered");
        Ok(())
    }

    /// Returns `true` only if a credential hash is stored.
    ///
    /// An identity can exist without being registered (e.g. a row created
    /// by an earlier, incomplete registration attempt).
    pub async fn is_registered(&self, player: PlayerId) -> bool {
        self.try_is_registered(player)
            .await
            .or_fallback("is_registered", false)
    }

    async fn try_is_registered(&self, player: PlayerId) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let row = sqlx::query(
            "SELECT 1 FROM players WHERE player_id = ?1 AND credential_hash IS NOT NULL",
        )
        .bind(player.to_string())
        .fetch_optional(lease.pool())
        .await?;
        Ok(row.is_some())
    }

    /// Returns the stored credential hash, or `None` if absent.
    pub async fn check_credential(&self, player: PlayerId) -> Option<String> {
        self.try_check_credential(player)
            .await
            .or_default_logged("check_credential")
    }

    async fn try_check_credential(&self, player: PlayerId) -> StorageResult<Option<String>> {
        let lease = self.db.acquire().await?;
        let hash: Option<Option<String>> =
            sqlx::query_scalar("SELECT credential_hash FROM players WHERE player_id = ?1")
                .bind(player.to_string())
                .fetch_optional(lease.pool())
                .await?;
        Ok(hash.flatten())
    }

    // =====================================================================
    // Profile
    // =====================================================================

    /// Reads the whole identity record, or `None` if the player is unknown.
    pub async fn profile(&self, player: PlayerId) -> Option<IdentityRecord> {
        self.try_profile(player).await.or_default_logged("profile")
    }

    async fn try_profile(&self, player: PlayerId) -> StorageResult<Option<IdentityRecord>> {
        let lease = self.db.acquire().await?;
        let row = sqlx::query(
            r#"
            SELECT player_id, display_name, credential_hash, last_origin, registered_at,
                   last_login, is_banned, ban_reason, ban_until, is_muted, mute_reason,
                   mute_until, gender
              FROM players
             WHERE player_id = ?1
            "#,
        )
        .bind(player.to_string())
        .fetch_optional(lease.pool())
        .await?;

        row.map(|row| record_from_row(&row, Timestamp::now()))
            .transpose()
    }

    /// Records a successful login: last-login time and origin.
    ///
    /// Returns `false` if the player has no identity record.
    pub async fn record_login(&self, player: PlayerId, origin: &str) -> StorageResult<bool> {
        self.try_record_login(player, origin)
            .await
            .logged("record_login")
    }

    async fn try_record_login(&self, player: PlayerId, origin: &str) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let result = sqlx::query(
            "UPDATE players SET last_login = ?1, last_origin = ?2 WHERE player_id = ?3",
        )
        .bind(Timestamp::now().as_millis())
        .bind(origin)
        .bind(player.to_string())
        .execute(lease.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Sets the profile gender. Returns `false` if the player is unknown.
    pub async fn set_gender(&self, player: PlayerId, gender: Gender) -> StorageResult<bool> {
        self.try_set_gender(player, gender).await.logged("set_gender")
    }

    async fn try_set_gender(&self, player: PlayerId, gender: Gender) -> StorageResult<bool> {
        let lease = self.db.acquire().await?;
        let result = sqlx::query("UPDATE players SET gender = ?1 WHERE player_id = ?2")
            .bind(gender.as_str())
            .bind(player.to_string())
            .execute(lease.pool())
            .await?;
        tracing::debug!(%player, %gender, "gender updated");
        Ok(result.rows_affected() > 0)
    }

    /// The profile gender; [`Gender::Male`] when unknown or unreadable.
    pub async fn gender(&self, player: PlayerId) -> Gender {
        self.try_gender(player).await.or_default_logged("gender")
    }

    async fn try_gender(&self, player: PlayerId) -> StorageResult<Gender> {
        let lease = self.db.acquire().await?;
        let stored: Option<String> =
            sqlx::query_scalar("SELECT gender FROM players WHERE player_id = ?1")
                .bind(player.to_string())
                .fetch_optional(lease.pool())
                .await?;
        match stored {
            Some(text) => Ok(text.parse()?),
            None => Ok(Gender::default()),
        }
    }
}

fn record_from_row(row: &SqliteRow, now: Timestamp) -> StorageResult<IdentityRecord> {
    let player: String = row.try_get("player_id")?;
    let gender: String = row.try_get("gender")?;

    let ban = Restriction::from_columns(
        row.try_get("is_banned")?,
        row.try_get("ban_reason")?,
        row.try_get("ban_until")?,
    );
    let mute = Restriction::from_columns(
        row.try_get("is_muted")?,
        row.try_get("mute_reason")?,
        row.try_get("mute_until")?,
    );

    Ok(IdentityRecord {
        player: player.parse()?,
        display_name: row.try_get("display_name")?,
        registered: row.try_get::<Option<String>, _>("credential_hash")?.is_some(),
        last_origin: row.try_get("last_origin")?,
        registered_at: row
            .try_get::<Option<i64>, _>("registered_at")?
            .map(Timestamp::from_millis),
        last_login: row
            .try_get::<Option<i64>, _>("last_login")?
            .map(Timestamp::from_millis),
        ban: visible(ban, now),
        mute: visible(mute, now),
        gender: gender.parse()?,
    })
}

/// Hides a restriction whose expiry has already passed.
fn visible(restriction: Restriction, now: Timestamp) -> Restriction {
    if restriction.is_expired_at(now) {
        Restriction::Clear
    } else {
        restriction
    }
}

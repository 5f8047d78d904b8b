use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stronghold_storage::sqlx;
use stronghold_storage::{Database, Fallback, Lease, StorageResult};
use stronghold_types::PlayerId;

const LOCK_SCOPE: &str = "ledger";

/// The outcome of [`LedgerStore::debit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Debit {
    /// The balance after the debit.
    pub balance: f64,
    /// `true` if the balance could not cover the amount and was clamped
    /// to 0, i.e. the debit was only partially applied.
    pub clamped: bool,
}

/// Access to the `balances` table.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    db: Arc<Database>,
}

impl LedgerStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The player's balance. Absent rows and failed reads both report 0.
    pub async fn get_balance(&self, player: PlayerId) -> f64 {
        self.try_get_balance(player)
            .await
            .or_fallback("get_balance", 0.0)
    }

    async fn try_get_balance(&self, player: PlayerId) -> StorageResult<f64> {
        let lease = self.db.acquire().await?;
        read(&lease, player).await
    }

    /// Overwrites the balance.
    ///
    /// Negative values are stored as 0 so a balance is never observed
    /// below zero.
    pub async fn set_balance(&self, player: PlayerId, value: f64) -> StorageResult<()> {
        self.try_set_balance(player, value)
            .await
            .logged("set_balance")
    }

    async fn try_set_balance(&self, player: PlayerId, value: f64) -> StorageResult<()> {
        let lease = self.db.acquire().await?;
        let _key = lease.lock_key(LOCK_SCOPE, player.to_string()).await;
        if value < 0.0 {
            tracing::warn!(%player, value, "negative balance stored as 0");
        }
        write(&lease, player, non_negative(value)).await?;
        tracing::debug!(%player, value, "balance set");
        Ok(())
    }

    /// Credits `amount` and returns the new balance.
    pub async fn add_balance(&self, player: PlayerId, amount: f64) -> StorageResult<f64> {
        self.try_adjust(player, amount)
            .await
            .map(|debit| debit.balance)
            .logged("add_balance")
    }

    /// Debits `amount`, clamping at 0, and returns the new balance.
    ///
    /// Overdraft is silent here. Use [`debit`](Self::debit) to find out
    /// whether the full amount was covered.
    pub async fn remove_balance(&self, player: PlayerId, amount: f64) -> StorageResult<f64> {
        self.try_adjust(player, -amount)
            .await
            .map(|debit| debit.balance)
            .logged("remove_balance")
    }

    /// Debits `amount`, clamping at 0, and reports whether clamping
    /// happened.
    pub async fn debit(&self, player: PlayerId, amount: f64) -> StorageResult<Debit> {
        self.try_adjust(player, -amount).await.logged("debit")
    }

    async fn try_adjust(&self, player: PlayerId, delta: f64) -> StorageResult<Debit> {
        let lease = self.db.acquire().await?;
        let _key = lease.lock_key(LOCK_SCOPE, player.to_string()).await;

        let current = read(&lease, player).await?;
        let target = current + delta;
        let debit = Debit {
            balance: non_negative(target),
            clamped: target < 0.0,
        };
        write(&lease, player, debit.balance).await?;

        if debit.clamped {
            tracing::debug!(%player, delta, current, "debit clamped at zero");
        } else {
            tracing::debug!(%player, delta, balance = debit.balance, "balance adjusted");
        }
        Ok(debit)
    }
}

async fn read(lease: &Lease<'_>, player: PlayerId) -> StorageResult<f64> {
    let balance: Option<f64> =
        sqlx::query_scalar("SELECT balance FROM balances WHERE player_id = ?1")
            .bind(player.to_string())
            .fetch_optional(lease.pool())
            .await?;
    Ok(balance.unwrap_or(0.0))
}

async fn write(lease: &Lease<'_>, player: PlayerId, balance: f64) -> StorageResult<()> {
    sqlx::query(
        r#"
        INSERT INTO balances (player_id, balance) VALUES (?1, ?2)
        ON CONFLICT (player_id) DO UPDATE SET balance = excluded.balance
        "#,
    )
    .bind(player.to_string())
    .bind(balance)
    .execute(lease.pool())
    .await?;
    Ok(())
}

/// Clamps to `[0, ∞)`. NaN becomes 0.
fn non_negative(value: f64) -> f64 {
    if value > 0.0 { value } else { 0.0 }
}

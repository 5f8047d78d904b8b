//! `Stronghold` builder and the wired-up core.
//!
//! This is the entry point for a host server. It opens the one
//! [`Database`] and hands a shared reference to every store, so there is
//! no global instance anywhere: whoever holds the `Stronghold` (or a store
//! cloned out of it) has access, nobody else does.

use std::sync::Arc;

use stronghold_audit::AuditStore;
use stronghold_identity::IdentityStore;
use stronghold_ledger::LedgerStore;
use stronghold_location::{HomeWrite, LocationStore};
use stronghold_social::SocialStore;
use stronghold_storage::{Database, StorageConfig};
use stronghold_types::{Gender, Location, PlayerId, Timestamp};

use crate::{CoreConfig, StrongholdError};

/// Builder for opening a [`Stronghold`].
///
/// # Example
///
/// ```rust,ignore
/// let core = Stronghold::builder()
///     .config(CoreConfig::from_json(&text)?)
///     .storage(StorageConfig::in_memory())
///     .open()
///     .await?;
/// ```
pub struct StrongholdBuilder {
    config: CoreConfig,
}

impl StrongholdBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: CoreConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: CoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets where and how the database is opened.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Sets the balance new registrations start with.
    pub fn starting_balance(mut self, balance: f64) -> Self {
        self.config.starting_balance = balance;
        self
    }

    /// Sets the home quota used by [`Stronghold::set_home`].
    pub fn default_home_quota(mut self, quota: u32) -> Self {
        self.config.default_home_quota = quota;
        self
    }

    /// Opens the database, creates the schema, and builds the stores.
    ///
    /// # Errors
    /// [`StorageError::Unavailable`](stronghold_storage::StorageError::Unavailable)
    /// wrapped in [`StrongholdError::Storage`] if the database cannot be
    /// opened or initialized. Startup should abort on this error.
    pub async fn open(self) -> Result<Stronghold, StrongholdError> {
        let db = Database::open(&self.config.storage).await?;
        Ok(Stronghold::with_database(Arc::new(db), self.config))
    }
}

impl Default for StrongholdBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The persistence core: one database, one store per concern.
///
/// Stores are cheap handles; clone one out (`core.ledger().clone()`) to
/// move it into a task.
#[derive(Debug)]
pub struct Stronghold {
    db: Arc<Database>,
    config: CoreConfig,
    identity: IdentityStore,
    ledger: LedgerStore,
    location: LocationStore,
    social: Option<SocialStore>,
    audit: Option<AuditStore>,
}

impl Stronghold {
    /// Creates a new builder.
    pub fn builder() -> StrongholdBuilder {
        StrongholdBuilder::new()
    }

    /// Builds the stores over an already opened database.
    ///
    /// `config.storage` is ignored; the database is used as given.
    pub fn with_database(db: Arc<Database>, config: CoreConfig) -> Self {
        let features = config.features;
        tracing::info!(
            auth = features.auth,
            logs = features.logs,
            gender = features.gender,
            friends = features.friends,
            "stronghold ready"
        );
        Self {
            identity: IdentityStore::new(Arc::clone(&db), config.identity()),
            ledger: LedgerStore::new(Arc::clone(&db)),
            location: LocationStore::new(Arc::clone(&db)),
            social: features.friends.then(|| SocialStore::new(Arc::clone(&db))),
            audit: features.logs.then(|| AuditStore::new(Arc::clone(&db))),
            db,
            config,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// The shared database handle.
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    // ---------------------------------------------------------------------
    // Stores
    // ---------------------------------------------------------------------

    /// Identity records and restrictions. Always available: bans and
    /// mutes apply whether or not the server runs its own login.
    pub fn identity(&self) -> &IdentityStore {
        &self.identity
    }

    /// The identity store for registration and sessions, or `None` when
    /// the `auth` feature is off.
    pub fn auth(&self) -> Option<&IdentityStore> {
        self.config.features.auth.then_some(&self.identity)
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn location(&self) -> &LocationStore {
        &self.location
    }

    /// `None` when the `friends` feature is off.
    pub fn social(&self) -> Option<&SocialStore> {
        self.social.as_ref()
    }

    /// `None` when the `logs` feature is off.
    pub fn audit(&self) -> Option<&AuditStore> {
        self.audit.as_ref()
    }

    // ---------------------------------------------------------------------
    // Config-aware shortcuts
    // ---------------------------------------------------------------------

    /// Issues a session with the configured TTL.
    ///
    /// # Errors
    /// [`StrongholdError::FeatureDisabled`] when `auth` is off.
    pub async fn issue_session(
        &self,
        player: PlayerId,
        origin: &str,
    ) -> Result<Timestamp, StrongholdError> {
        let auth = self.auth().ok_or(StrongholdError::FeatureDisabled("auth"))?;
        Ok(auth
            .issue_session(player, origin, self.config.session_ttl())
            .await?)
    }

    /// Saves a home, enforcing the configured default quota.
    pub async fn set_home(
        &self,
        player: PlayerId,
        name: &str,
        location: &Location,
    ) -> Result<HomeWrite, StrongholdError> {
        Ok(self
            .location
            .set_home_within_quota(player, name, location, self.config.default_home_quota)
            .await?)
    }

    /// The player's gender, or `None` when the `gender` feature is off.
    pub async fn gender(&self, player: PlayerId) -> Option<Gender> {
        if !self.config.features.gender {
            return None;
        }
        Some(self.identity.gender(player).await)
    }

    /// Sets the player's gender.
    ///
    /// # Errors
    /// [`StrongholdError::FeatureDisabled`] when `gender` is off.
    pub async fn set_gender(&self, player: PlayerId, gender: Gender) -> Result<bool, StrongholdError> {
        if !self.config.features.gender {
            return Err(StrongholdError::FeatureDisabled("gender"));
        }
        Ok(self.identity.set_gender(player, gender).await?)
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Closes the database after in-flight operations finish.
    ///
    /// Idempotent. Store calls made afterwards degrade (reads) or fail
    /// with [`StorageError::Closed`](stronghold_storage::StorageError::Closed)
    /// (writes).
    pub async fn close(&self) {
        self.db.close().await;
    }
}

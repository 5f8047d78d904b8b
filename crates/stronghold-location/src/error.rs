//! Error types for the location store.

use stronghold_storage::StorageError;

/// Errors from quota-checked home writes.
///
/// Plain home and spawn writes return [`StorageError`] directly; only
/// [`set_home_within_quota`](crate::LocationStore::set_home_within_quota)
/// can refuse a write for a reason of its own.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    /// The player already holds `quota` homes and the name is new.
    #[error("home quota reached ({count}/{quota})")]
    QuotaExceeded { quota: u32, count: u32 },

    /// The underlying storage call failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

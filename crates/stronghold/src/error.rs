//! Unified error type for Stronghold.

use stronghold_location::LocationError;
use stronghold_storage::StorageError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `stronghold` facade, you deal with this single error
/// type instead of importing errors from each store crate. The `#[from]`
/// attributes generate `From` impls, so `?` converts automatically.
#[derive(Debug, thiserror::Error)]
pub enum StrongholdError {
    /// The storage engine failed (open, statement, or use after close).
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A home write was refused or failed.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The operation belongs to a feature switched off in [`FeatureFlags`](crate::FeatureFlags).
    #[error("feature disabled: {0}")]
    FeatureDisabled(&'static str),
}

impl StrongholdError {
    /// Returns `true` if the error only means the core was already closed.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            Self::Storage(StorageError::Closed)
                | Self::Location(LocationError::Storage(StorageError::Closed))
        )
    }
}

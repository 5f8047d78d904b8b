//! The identity record as read back from storage.

use serde::{Deserialize, Serialize};
use stronghold_types::{Gender, PlayerId, Restriction, Timestamp};

/// Everything stored about one player, minus the credential hash.
///
/// Restriction states in a record are a view: an expired restriction is
/// shown as [`Restriction::Clear`] even if the row has not been corrected
/// yet. Use [`IdentityStore::is_restricted`](crate::IdentityStore::is_restricted)
/// when the row itself should be corrected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub player: PlayerId,
    pub display_name: String,
    /// `true` once a credential hash has been stored.
    pub registered: bool,
    pub last_origin: Option<String>,
    pub registered_at: Option<Timestamp>,
    pub last_login: Option<Timestamp>,
    pub ban: Restriction,
    pub mute: Restriction,
    pub gender: Gender,
}

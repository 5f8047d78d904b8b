//! Small status enums stored alongside identities and audit records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Expiry, Timestamp, TypeError};

// ---------------------------------------------------------------------------
// RestrictionKind
// ---------------------------------------------------------------------------

/// The two independent restrictions a player can carry.
///
/// Both follow the same [`Restriction`] automaton; they only differ in
/// which columns of the identity record hold their state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
    /// Prevents connecting.
    Ban,
    /// Prevents chatting.
    Mute,
}

impl fmt::Display for RestrictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ban => write!(f, "ban"),
            Self::Mute => write!(f, "mute"),
        }
    }
}

// ---------------------------------------------------------------------------
// Restriction
// ---------------------------------------------------------------------------

/// The state of one restriction on one player.
///
/// A two-state machine:
///
/// ```text
///   Clear ──(restrict)──→ Restricted { reason, expires }
///     ↑                          │
///     └──(lift, or expiry observed on read)──┘
/// ```
///
/// Expiry is lazy: nothing flips a `Restricted` back to `Clear` in the
/// background. The store notices a passed expiry the next time somebody
/// asks, clears the row, and reports `Clear`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Restriction {
    #[default]
    Clear,
    Restricted {
        reason: Option<String>,
        expires: Expiry,
    },
}

impl Restriction {
    /// Returns `true` for the `Restricted` state, regardless of expiry.
    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Restricted { .. })
    }

    /// Returns `true` when this is a `Restricted` state whose finite expiry
    /// has been reached at `now`. Such a state must be cleared on read.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        match self {
            Self::Clear => false,
            Self::Restricted { expires, .. } => expires.has_passed(now),
        }
    }

    /// The recorded reason, if restricted and one was given.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Restricted { reason, .. } => reason.as_deref(),
            Self::Clear => None,
        }
    }

    /// Rebuilds the state from the identity-record columns
    /// (`is_*`, `*_reason`, `*_until`).
    pub fn from_columns(active: bool, reason: Option<String>, until: Option<i64>) -> Self {
        if active {
            Self::Restricted {
                reason,
                expires: Expiry::from_column(until),
            }
        } else {
            Self::Clear
        }
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Profile attribute used by chat and tab-list formatting upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    /// Column encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(TypeError::UnknownGender(other.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// What a player did to the world.
///
/// The common actions get variants; anything else a caller logs is kept
/// verbatim in `Other`, so unknown rows read back without loss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Place,
    Break,
    Interact,
    Other(String),
}

impl AuditAction {
    /// Column encoding.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Place => "place",
            Self::Break => "break",
            Self::Interact => "interact",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for AuditAction {
    fn from(s: &str) -> Self {
        match s {
            "place" => Self::Place,
            "break" => Self::Break,
            "interact" => Self::Interact,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Restriction
    // =====================================================================

    #[test]
    fn test_restriction_default_is_clear() {
        assert_eq!(Restriction::default(), Restriction::Clear);
        assert!(!Restriction::Clear.is_restricted());
    }

    #[test]
    fn test_restriction_from_columns_inactive_ignores_stale_fields() {
        // A cleared row may still carry leftovers; the flag wins.
        let r = Restriction::from_columns(false, Some("spam".into()), Some(10));
        assert_eq!(r, Restriction::Clear);
    }

    #[test]
    fn test_restriction_from_columns_null_until_means_never() {
        let r = Restriction::from_columns(true, Some("griefing".into()), None);
        assert_eq!(
            r,
            Restriction::Restricted {
                reason: Some("griefing".into()),
                expires: Expiry::Never,
            }
        );
        assert_eq!(r.reason(), Some("griefing"));
    }

    #[test]
    fn test_restriction_is_expired_at_only_for_finite_passed_expiry() {
        let now = Timestamp::from_millis(1_000);
        let permanent = Restriction::Restricted { reason: None, expires: Expiry::Never };
        let past = Restriction::Restricted {
            reason: None,
            expires: Expiry::At(Timestamp::from_millis(999)),
        };
        let future = Restriction::Restricted {
            reason: None,
            expires: Expiry::At(Timestamp::from_millis(1_001)),
        };

        assert!(!permanent.is_expired_at(now));
        assert!(past.is_expired_at(now));
        assert!(!future.is_expired_at(now));
        assert!(!Restriction::Clear.is_expired_at(now));
    }

    // =====================================================================
    // Gender / AuditAction
    // =====================================================================

    #[test]
    fn test_gender_parse_known_values() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("robot".parse::<Gender>().is_err());
    }

    #[test]
    fn test_audit_action_unknown_text_is_preserved() {
        let action = AuditAction::from("ignite");
        assert_eq!(action, AuditAction::Other("ignite".into()));
        assert_eq!(action.as_str(), "ignite");
        assert_eq!(AuditAction::from("break"), AuditAction::Break);
    }
}

//! Absolute instants and expiry.
//!
//! Stored time is always wall-clock milliseconds since the Unix epoch, in a
//! single unit, so every table can compare instants with plain integer
//! arithmetic in SQL.

use std::fmt;
use std::ops::Add;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// An absolute instant, in milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The current wall-clock instant.
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Builds a timestamp from raw epoch milliseconds (the column encoding).
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Epoch milliseconds, ready to bind into an `INTEGER` column.
    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

/// `timestamp + duration` saturates instead of overflowing. A TTL of
/// `Duration::MAX` therefore lands on `i64::MAX`, which is still a finite
/// instant (use [`Expiry::Never`] to mean "never").
impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        let millis = i64::try_from(rhs.as_millis()).unwrap_or(i64::MAX);
        Timestamp(self.0.saturating_add(millis))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

/// When a restriction stops applying.
///
/// "Never" is its own variant rather than a far-future number, so a
/// permanent ban can never silently turn into a very long temporary one.
///
/// In storage, `Never` is a `NULL` expiry column and `At(t)` is
/// `t.as_millis()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiry {
    /// The restriction is permanent until lifted.
    Never,
    /// The restriction ends at this instant.
    At(Timestamp),
}

impl Expiry {
    /// An expiry `duration` from now.
    pub fn after(duration: Duration) -> Self {
        Self::At(Timestamp::now() + duration)
    }

    /// Returns `true` once `now` has reached the expiry instant.
    /// `Never` never passes.
    pub fn has_passed(&self, now: Timestamp) -> bool {
        match self {
            Self::Never => false,
            Self::At(at) => now >= *at,
        }
    }

    /// Column encoding: `None` for `Never`.
    pub fn to_column(&self) -> Option<i64> {
        match self {
            Self::Never => None,
            Self::At(at) => Some(at.as_millis()),
        }
    }

    /// Inverse of [`to_column`](Self::to_column).
    pub fn from_column(value: Option<i64>) -> Self {
        match value {
            None => Self::Never,
            Some(millis) => Self::At(Timestamp::from_millis(millis)),
        }
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => write!(f, "never"),
            Self::At(at) => write!(f, "{at}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_add_duration_advances_millis() {
        let t = Timestamp::from_millis(1_000);
        assert_eq!(t + Duration::from_millis(250), Timestamp::from_millis(1_250));
    }

    #[test]
    fn test_timestamp_add_huge_duration_saturates() {
        let t = Timestamp::from_millis(1_000);
        assert_eq!((t + Duration::MAX).as_millis(), i64::MAX);
    }

    #[test]
    fn test_expiry_never_never_passes() {
        let far = Timestamp::from_millis(i64::MAX);
        assert!(!Expiry::Never.has_passed(far));
    }

    #[test]
    fn test_expiry_at_passes_on_and_after_instant() {
        let expiry = Expiry::At(Timestamp::from_millis(500));
        assert!(!expiry.has_passed(Timestamp::from_millis(499)));
        assert!(expiry.has_passed(Timestamp::from_millis(500)));
        assert!(expiry.has_passed(Timestamp::from_millis(501)));
    }

    #[test]
    fn test_expiry_column_encoding_keeps_never_distinct_from_past() {
        // A past instant and "never" must not collapse into the same column.
        assert_eq!(Expiry::Never.to_column(), None);
        assert_eq!(Expiry::At(Timestamp::from_millis(0)).to_column(), Some(0));
        assert_eq!(Expiry::from_column(None), Expiry::Never);
        assert_eq!(
            Expiry::from_column(Some(0)),
            Expiry::At(Timestamp::from_millis(0))
        );
    }

    #[test]
    fn test_timestamp_display_is_rfc3339() {
        assert_eq!(
            Timestamp::from_millis(0).to_string(),
            "1970-01-01T00:00:00+00:00"
        );
    }
}

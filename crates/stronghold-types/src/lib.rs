//! Shared value types for Stronghold.
//!
//! Every store in the workspace speaks in these types:
//!
//! - **Identity** ([`PlayerId`]): the stable key every record hangs off.
//! - **Time** ([`Timestamp`], [`Expiry`]): absolute instants in
//!   milliseconds since the Unix epoch, plus the "never expires" sentinel.
//! - **World** ([`Location`], [`Position`], [`Orientation`], [`BlockPos`]):
//!   where bookmarks point and where audit events happened.
//! - **Status** ([`Restriction`], [`RestrictionKind`], [`Gender`],
//!   [`AuditAction`]): the small enums stored alongside identities.
//!
//! # Architecture
//!
//! This crate sits below every store. It knows nothing about SQL or
//! connections; it only defines values and how they map to plain columns.
//!
//! ```text
//! Stores (identity, ledger, ...) → Storage engine → Types (this crate)
//! ```

mod error;
mod identity;
mod status;
mod time;
mod world;

pub use error::TypeError;
pub use identity::PlayerId;
pub use status::{AuditAction, Gender, Restriction, RestrictionKind};
pub use time::{Expiry, Timestamp};
pub use world::{BlockPos, Location, Orientation, Position};

//! The world audit log for Stronghold.
//!
//! One record per player action on a block, stamped with the time. Records
//! are appended and queried by exact block coordinate; nothing in this
//! crate updates or deletes them.

mod record;
mod store;

pub use record::AuditRecord;
pub use store::{AuditStore, NEAR_QUERY_LIMIT};

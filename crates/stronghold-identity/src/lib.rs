//! Player identity and access state for Stronghold.
//!
//! This crate handles everything that decides whether a player may be on
//! the server, and as whom:
//!
//! 1. **Registration**: creating the identity record, storing the
//!    credential hash, seeding the ledger ([`IdentityStore::register`]).
//! 2. **Sessions**: a short-lived proof that a player authenticated from a
//!    given network origin ([`IdentityStore::issue_session`],
//!    [`IdentityStore::has_valid_session`]).
//! 3. **Restrictions**: bans and mutes with optional expiry, cleared lazily
//!    when a read observes that the expiry passed
//!    ([`IdentityStore::is_restricted`]).
//! 4. **Profile**: display name, login bookkeeping, gender.
//!
//! # How it fits in the stack
//!
//! ```text
//! Callers (auth, admin, chat modules)  ← decide what to do with the answers
//!     ↕
//! Identity store (this crate)  ← players + sessions tables
//!     ↕
//! Storage engine  ← pool, teardown gate, key locks
//! ```
//!
//! Session validity and restriction state are independent: a banned player
//! can still hold a valid session record. Enforcing the ban is the caller's
//! check.

mod config;
mod record;
mod restriction;
mod session;
mod store;

pub use config::IdentityConfig;
pub use record::IdentityRecord;
pub use store::IdentityStore;

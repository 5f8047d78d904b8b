//! Economy balances for Stronghold.
//!
//! One non-negative balance per player. A player without a ledger row has
//! a balance of 0; rows are seeded by registration in the identity store.
//!
//! # How it fits in the stack
//!
//! ```text
//! Callers (shops, commands, rewards)
//!     ↕
//! Ledger store (this crate)  ← balances table
//!     ↕
//! Storage engine  ← pool, teardown gate, key locks
//! ```
//!
//! Every read-modify-write runs under the `"ledger"` key lock for that
//! player, so concurrent credits to one player never lose an update while
//! other players' balances stay untouched.

mod ledger;

pub use ledger::{Debit, LedgerStore};

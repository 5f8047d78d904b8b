//! The social graph for Stronghold.
//!
//! Relationships are stored as directed edges `a → b`. Adding or removing
//! `a → b` never touches `b → a`; a one-sided edge can stand for a pending
//! friend request. Callers that want friendship to be mutual use
//! [`SocialStore::add_mutual`] and [`SocialStore::remove_mutual`], which
//! write both edges in one transaction.

mod graph;

pub use graph::SocialStore;

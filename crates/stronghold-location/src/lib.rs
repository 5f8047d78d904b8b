//! Saved positions for Stronghold.
//!
//! Two kinds of bookmark:
//!
//! 1. **Homes**: any number of named positions per player, unique by
//!    `(player, name)`. Setting an existing name replaces it.
//! 2. **Spawn**: one global position. At most one row ever exists.
//!
//! How many homes a player may hold is the caller's business. Either check
//! [`LocationStore::count_homes`] before [`LocationStore::set_home`], or use
//! [`LocationStore::set_home_within_quota`], which does both atomically.

mod error;
mod home;
mod spawn;
mod store;

pub use error::LocationError;
pub use home::{Home, HomeWrite};
pub use store::LocationStore;

//! Degrading failed calls to safe defaults.
//!
//! Reads never crash the caller: a balance read that fails reports 0, a
//! restriction check that fails reports "clear", a boolean check reports
//! `false`. The failure is logged here, once, so every store degrades the
//! same way. Callers cannot tell "definitely not banned" from "could not
//! check"; that ambiguity is accepted.
//!
//! Writes keep their `Result` but go through [`Fallback::logged`] so the
//! failure is recorded even if the caller drops the error.

use crate::{StorageError, StorageResult};

/// Extension methods on [`StorageResult`].
pub trait Fallback<T> {
    /// Returns the value, or logs the error and returns `default`.
    fn or_fallback(self, op: &'static str, default: T) -> T;

    /// Like [`or_fallback`](Self::or_fallback) with `T::default()`.
    fn or_default_logged(self, op: &'static str) -> T
    where
        T: Default;

    /// Logs the error (if any) and passes the result through unchanged.
    fn logged(self, op: &'static str) -> StorageResult<T>;
}

impl<T> Fallback<T> for StorageResult<T> {
    fn or_fallback(self, op: &'static str, default: T) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                report(op, &e);
                default
            }
        }
    }

    fn or_default_logged(self, op: &'static str) -> T
    where
        T: Default,
    {
        self.or_fallback(op, T::default())
    }

    fn logged(self, op: &'static str) -> StorageResult<T> {
        if let Err(e) = &self {
            report(op, e);
        }
        self
    }
}

fn report(op: &'static str, e: &StorageError) {
    match e {
        // Calling after close is a caller bug, not an engine fault.
        StorageError::Closed => tracing::warn!(op, "storage used after close"),
        _ => tracing::error!(op, error = %e, "storage operation failed"),
    }
}

//! Error types for parsing stored values.
//!
//! Columns come back from storage as plain text. When that text does not
//! map onto one of our types, we report it with a [`TypeError`] instead of
//! guessing.

/// Errors raised when a raw column value cannot be turned into a type.
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// The text is not a valid player identity token.
    #[error("invalid player id {0:?}")]
    InvalidPlayerId(String),

    /// The text does not name a known gender.
    #[error("unknown gender {0:?}")]
    UnknownGender(String),
}

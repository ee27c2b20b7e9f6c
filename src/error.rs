//! Structural errors for season documents.
//!
//! Only problems that make a snapshot unusable as a whole live here. Bad
//! per-field values are defaulted during decoding and never reach this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StandingsError {
    /// The document is not a JSON object.
    #[error("season document is not an object")]
    NotAnObject,

    /// A required top-level list is absent or not a list.
    #[error("season document has no `{0}` list")]
    MissingField(&'static str),

    /// The document has the right top-level shape but a record inside it cannot be decoded.
    #[error("malformed season document: {0}")]
    Malformed(#[from] serde_json::Error),
}

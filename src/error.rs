//! Lookup error kinds.
//!
//! Callers only ever see two failures: the word has no usable entry, or the
//! upstream dictionary could not be queried. Structural faults found while
//! normalizing a document never escape as their own kind; the normalizer
//! folds them into [`DictError::NotFound`].

use thiserror::Error;

/// Errors surfaced by a dictionary lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictError {
    /// No usable entry exists for the word.
    #[error("\"{0}\" not found")]
    NotFound(String),

    /// The upstream provider failed (rate limit, auth, transport).
    #[error("query for \"{0}\" failed")]
    QueryFailure(String),
}

impl DictError {
    /// The word the failed lookup was for.
    pub fn word(&self) -> &str {
        match self {
            DictError::NotFound(word) | DictError::QueryFailure(word) => word,
        }
    }
}

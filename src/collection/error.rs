//! Error types for the ordered collections
//!
//! The tree and its adapters never merge, retry or partially apply an
//! operation. Every failure is reported here and leaves the structure exactly
//! as it was.

use thiserror::Error;

/// A key (or key component) that is empty or otherwise unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid key: {0}")]
pub struct InvalidKey(pub String);

impl InvalidKey {
    /// Shorthand for an empty required component
    pub fn empty(component: &str) -> Self {
        Self(format!("{} cannot be empty", component))
    }
}

/// Failure of a tree or collection operation
///
/// `E` is the stored value type. A `KeyConflict` hands the caller a copy of
/// the value that already occupies the key, never the rejected one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError<E> {
    /// No value is stored under the requested key
    #[error("key not found")]
    NotFound,

    /// The key is already held by a different value
    #[error("key is already occupied")]
    KeyConflict { existing: E },

    /// The supplied key or key component was rejected
    #[error(transparent)]
    InvalidInput(#[from] InvalidKey),
}

impl<E> CollectionError<E> {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Check if this is a key conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::KeyConflict { .. })
    }

    /// The occupying value, if this is a key conflict
    pub fn into_existing(self) -> Option<E> {
        match self {
            Self::KeyConflict { existing } => Some(existing),
            _ => None,
        }
    }
}

/// Result type alias for collection operations
pub type CollectionResult<T, E> = Result<T, CollectionError<E>>;

//! Custom error types for the ledger application
//!
//! The collection core reports `CollectionError<E>`; everything above it
//! (ledger, services, storage, CLI) speaks `LedgerError`, defined here with
//! thiserror.

use thiserror::Error;

use crate::collection::{CollectionError, InvalidKey, Keyed};
use crate::models::LedgerEntity;

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input and key components
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The key is held by another entity
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Removal refused because other records depend on the entity
    #[error("{entity_type} '{identifier}' still has {count} dependent record(s)")]
    Dependents {
        entity_type: &'static str,
        identifier: String,
        count: usize,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LedgerError {
    /// Translate a collection failure on entity `E` at `key`
    pub fn from_collection<E: LedgerEntity>(err: CollectionError<E>, key: &E::Key) -> Self {
        match err {
            CollectionError::NotFound => Self::NotFound {
                entity_type: E::KIND,
                identifier: key.to_string(),
            },
            CollectionError::KeyConflict { existing } => Self::Duplicate {
                entity_type: E::KIND,
                identifier: existing.key().to_string(),
            },
            CollectionError::InvalidInput(invalid) => Self::Validation(invalid.0),
        }
    }

    /// Create a "not found" error for providers
    pub fn provider_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Provider",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a duplicate-key error
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<InvalidKey> for LedgerError {
    fn from(err: InvalidKey) -> Self {
        Self::Validation(err.0)
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, Provider, ProviderKey};

    fn key() -> ProviderKey {
        ProviderKey::new("Bodega", Address::new("Lima", "Surco", "Av. Primavera").unwrap()).unwrap()
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_from_collection() {
        let err = LedgerError::from_collection::<Provider>(CollectionError::NotFound, &key());
        assert_eq!(
            err.to_string(),
            "Provider not found: Bodega (Av. Primavera, Surco, Lima)"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_conflict_names_occupant() {
        let occupant = Provider::new("Bodega", Address::new("Lima", "Surco", "Jr. Ayacucho").unwrap())
            .unwrap();
        let err = LedgerError::from_collection(
            CollectionError::KeyConflict { existing: occupant },
            &key(),
        );
        assert!(err.is_duplicate());
        assert!(err.to_string().contains("Jr. Ayacucho"));
    }

    #[test]
    fn test_invalid_key_is_validation() {
        let err: LedgerError = InvalidKey::empty("City").into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: City cannot be empty");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LedgerError = io_err.into();
        assert!(matches!(err, LedgerError::Io(_)));
    }
}

//! Error types for EngageDB.
//!
//! `EngageError` is the only error returned by public APIs. Specific
//! error types (`StorageError`, `ValidationError`, `NotFoundError`) carry detail.
//!
//! Two conditions that look like failures are deliberately *not* errors:
//! a duplicate achievement grant and a duplicate vote both surface as a
//! `false` outcome from the store and are treated as no-ops.

use thiserror::Error;

/// Result type alias for EngageDB operations.
pub type Result<T> = std::result::Result<T, EngageError>;

/// Top-level error enum for all EngageDB operations.
#[derive(Debug, Error)]
pub enum EngageError {
    /// Storage layer error (I/O, corruption, transactions).
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of what's wrong with the configuration.
        reason: String,
    },

    /// Requested entity not found.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngageError {
    /// Creates a configuration error with the given reason.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if the failure came from a store round-trip.
    ///
    /// Callers may retry these; the engine itself never does and never
    /// substitutes a cached or partial result.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_))
    }
}

/// Storage-related errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database file or data is corrupted.
    #[error("Database corrupted: {0}")]
    Corrupted(String),

    /// Database is locked by another process.
    #[error("Database is locked by another writer")]
    DatabaseLocked,

    /// Transaction failed (commit, rollback, etc.).
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from the redb storage engine.
    #[error("Storage engine error: {0}")]
    Redb(String),

    /// Database schema version doesn't match expected version.
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch {
        /// Expected schema version.
        expected: u32,
        /// Actual schema version found in database.
        found: u32,
    },
}

impl StorageError {
    /// Creates a corruption error with the given message.
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }

    /// Creates a transaction error with the given message.
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// Creates a serialization error with the given message.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

impl From<redb::Error> for StorageError {
    fn from(err: redb::Error) -> Self {
        StorageError::Redb(err.to_string())
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(err: redb::DatabaseError) -> Self {
        StorageError::Redb(err.to_string())
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(err: redb::TransactionError) -> Self {
        StorageError::Transaction(err.to_string())
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(err: redb::CommitError) -> Self {
        StorageError::Transaction(format!("Commit failed: {}", err))
    }
}

impl From<redb::TableError> for StorageError {
    fn from(err: redb::TableError) -> Self {
        StorageError::Redb(format!("Table error: {}", err))
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(err: redb::StorageError) -> Self {
        StorageError::Redb(format!("Storage error: {}", err))
    }
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<redb::TransactionError> for EngageError {
    fn from(err: redb::TransactionError) -> Self {
        EngageError::Storage(StorageError::from(err))
    }
}

impl From<redb::CommitError> for EngageError {
    fn from(err: redb::CommitError) -> Self {
        EngageError::Storage(StorageError::from(err))
    }
}

impl From<redb::TableError> for EngageError {
    fn from(err: redb::TableError) -> Self {
        EngageError::Storage(StorageError::from(err))
    }
}

impl From<redb::StorageError> for EngageError {
    fn from(err: redb::StorageError) -> Self {
        EngageError::Storage(StorageError::from(err))
    }
}

impl From<bincode::Error> for EngageError {
    fn from(err: bincode::Error) -> Self {
        EngageError::Storage(StorageError::from(err))
    }
}

/// Validation errors for caller-provided input.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field has an invalid value.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the invalid field.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// Content exceeds maximum allowed size.
    #[error("Content too large: {size} bytes (max: {max} bytes)")]
    ContentTooLarge {
        /// Actual content size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max: usize,
    },

    /// A required field is missing or empty.
    #[error("Required field missing: {field}")]
    RequiredField {
        /// Name of the missing field.
        field: String,
    },

    /// Too many items in a collection field.
    #[error("Too many items in '{field}': {count} (max: {max})")]
    TooManyItems {
        /// Name of the field.
        field: String,
        /// Actual count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
}

impl ValidationError {
    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a content too large error.
    pub fn content_too_large(size: usize, max: usize) -> Self {
        Self::ContentTooLarge { size, max }
    }

    /// Creates a required field error.
    pub fn required_field(field: impl Into<String>) -> Self {
        Self::RequiredField {
            field: field.into(),
        }
    }

    /// Creates a too many items error.
    pub fn too_many_items(field: impl Into<String>, count: usize, max: usize) -> Self {
        Self::TooManyItems {
            field: field.into(),
            count,
            max,
        }
    }
}

/// Not found errors for specific entity types.
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// No user registered under this ID.
    #[error("User not found: {0}")]
    User(String),

    /// Item with given ID not found.
    #[error("Item not found: {0}")]
    Item(String),

    /// Comment with given ID not found.
    #[error("Comment not found: {0}")]
    Comment(String),

    /// Collection with given ID not found.
    #[error("Collection not found: {0}")]
    Collection(String),
}

impl NotFoundError {
    /// Creates a user not found error.
    pub fn user(id: impl ToString) -> Self {
        Self::User(id.to_string())
    }

    /// Creates an item not found error.
    pub fn item(id: impl ToString) -> Self {
        Self::Item(id.to_string())
    }

    /// Creates a comment not found error.
    pub fn comment(id: impl ToString) -> Self {
        Self::Comment(id.to_string())
    }

    /// Creates a collection not found error.
    pub fn collection(id: impl ToString) -> Self {
        Self::Collection(id.to_string())
    }
}

//! Database error types
//!
//! This module defines the error types that can occur during database
//! operations and their mapping onto the domain-facing [`PortError`].

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value could not be decoded into its domain type
    #[error("Decode error on column {column}: {message}")]
    Decode { column: String, message: String },

    /// Generic SQL error
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Decode error for a column
    pub fn decode(column: impl Into<String>, message: impl std::fmt::Display) -> Self {
        DatabaseError::Decode {
            column: column.into(),
            message: message.to_string(),
        }
    }
}

impl From<DatabaseError> for PortError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => PortError::NotFound { entity_type, id },
            DatabaseError::DuplicateEntry(message) => PortError::Conflict { message },
            DatabaseError::ConnectionFailed(message) => PortError::Connection {
                message,
                source: None,
            },
            DatabaseError::SqlError(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                PortError::Conflict {
                    message: db.message().to_string(),
                }
            }
            DatabaseError::SqlError(sqlx::Error::PoolTimedOut) => {
                PortError::timeout("acquire database connection")
            }
            other => PortError::Internal {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

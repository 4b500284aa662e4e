//! Database error types.

use std::path::PathBuf;
use thiserror::Error;

/// Catalog database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Underlying `SQLite` error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Table names are interpolated into SQL and must be plain identifiers.
    #[error("invalid table name: {0}")]
    InvalidTableName(String),

    /// The database configuration file is malformed.
    #[error("invalid database configuration {path}: {reason}")]
    Config {
        /// Configuration file
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// A configured catalog file does not exist.
    #[error("catalog database not found: {}", .0.display())]
    MissingCatalog(PathBuf),

    /// The connection mutex was poisoned by a panicking thread.
    #[error("database connection lock poisoned")]
    LockPoisoned,

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;

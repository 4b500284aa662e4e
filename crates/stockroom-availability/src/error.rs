//! Error types for the availability orchestrator.

use std::path::PathBuf;
use stockroom_chem::ChemError;
use stockroom_core::ConfigError;
use stockroom_db::DatabaseError;
use stockroom_match::MatchError;
use thiserror::Error;

/// Errors raised while building or querying [`IsAvailable`](crate::IsAvailable).
#[derive(Error, Debug)]
pub enum AvailabilityError {
    /// A matcher could not be built, or an oracle lookup failed
    #[error(transparent)]
    Match(#[from] MatchError),

    /// Catalog databases could not be opened
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A compound from a list file could not be standardized
    #[error("invalid compound in {path}: {source}")]
    Standardization {
        /// File the compound came from
        path: PathBuf,
        /// Standardizer error
        source: ChemError,
    },

    /// A compound list file could not be read
    #[error("cannot read compound list {path}: {source}")]
    Io {
        /// File that failed to load
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A match came from a source that has no category
    #[error("no availability category for source {index}")]
    UnknownSource {
        /// Index of the source in the queried list
        index: usize,
    },
}

/// Result type alias for availability operations.
pub type Result<T> = std::result::Result<T, AvailabilityError>;

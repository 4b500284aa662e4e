//! Error types for structure parsing and standardization.

use thiserror::Error;

/// Errors raised while reading SMILES/SMARTS or standardizing identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChemError {
    /// The input is not a valid SMILES string
    #[error("invalid SMILES \"{input}\" at position {position}: {reason}")]
    Smiles {
        /// Offending SMILES string
        input: String,
        /// Byte offset where parsing failed
        position: usize,
        /// What went wrong
        reason: String,
    },

    /// The input is not a valid (or supported) SMARTS pattern
    #[error("invalid SMARTS \"{input}\" at position {position}: {reason}")]
    Smarts {
        /// Offending SMARTS string
        input: String,
        /// Byte offset where parsing failed
        position: usize,
        /// What went wrong
        reason: String,
    },

    /// A standardizer rejected its input
    #[error("cannot standardize \"{input}\": {reason}")]
    Standardization {
        /// Identifier that failed to standardize
        input: String,
        /// What went wrong
        reason: String,
    },
}

/// Result type alias for chemistry operations.
pub type Result<T> = std::result::Result<T, ChemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChemError::Smiles {
            input: "C1CC".to_string(),
            position: 4,
            reason: "unclosed ring bond 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid SMILES \"C1CC\" at position 4: unclosed ring bond 1"
        );
    }
}

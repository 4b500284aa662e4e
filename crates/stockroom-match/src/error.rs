//! Error types for availability matching.

use thiserror::Error;

/// Error reported by an external availability oracle.
pub type OracleError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while building or querying matchers.
#[derive(Error, Debug)]
pub enum MatchError {
    /// A regex or SMARTS pattern failed to compile
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// Pattern text as given
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// The external availability oracle failed
    #[error("availability oracle failed: {0}")]
    Oracle(OracleError),
}

/// Result type alias for matcher operations.
pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MatchError::InvalidPattern {
            pattern: "[O".to_string(),
            reason: "expected ']'".to_string(),
        };
        assert_eq!(err.to_string(), "invalid pattern \"[O\": expected ']'");

        let err = MatchError::Oracle("connection refused".into());
        assert_eq!(
            err.to_string(),
            "availability oracle failed: connection refused"
        );
    }
}

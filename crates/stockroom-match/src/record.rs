//! Match records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One positive availability match.
///
/// `details` names the rule that matched; `info` carries open-ended
/// metadata such as the source the match came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityMatch {
    details: String,
    #[serde(default)]
    info: Map<String, Value>,
}

impl AvailabilityMatch {
    /// Create a match without metadata.
    #[must_use]
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            details: details.into(),
            info: Map::new(),
        }
    }

    /// Add a metadata entry.
    #[must_use]
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }

    /// Human-readable reason for the match.
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Metadata attached to the match.
    #[must_use]
    pub fn info(&self) -> &Map<String, Value> {
        &self.info
    }

    /// Metadata value for `key` as a string, if present.
    #[must_use]
    pub fn info_str(&self, key: &str) -> Option<&str> {
        self.info.get(key).and_then(Value::as_str)
    }

    pub(crate) fn insert_info(&mut self, key: &str, value: Value) {
        self.info.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_entries() {
        let record = AvailabilityMatch::new("Found in the database.")
            .with_info("source", "emolecules")
            .with_info("price", 12.5);

        assert_eq!(record.details(), "Found in the database.");
        assert_eq!(record.info_str("source"), Some("emolecules"));
        assert_eq!(record.info().get("price"), Some(&Value::from(12.5)));
        assert_eq!(record.info_str("price"), None);
    }

    #[test]
    fn test_serialization() {
        let record =
            AvailabilityMatch::new("Matching regex \"CCc2cc\".").with_info("source", "regex");
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(
            json,
            r#"{"details":"Matching regex \"CCc2cc\".","info":{"source":"regex"}}"#
        );

        let parsed: AvailabilityMatch =
            serde_json::from_str(r#"{"details":"x"}"#).expect("deserialize");
        assert!(parsed.info().is_empty());
    }
}

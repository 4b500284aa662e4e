//! Substructure matcher.

use crate::availability::{no_matches, MatchIter, SmilesAvailability};
use crate::error::{MatchError, Result};
use crate::record::AvailabilityMatch;
use std::sync::Arc;
use stockroom_chem::{parse_smiles, SmartsPattern, Standardizer};
use tracing::debug;

/// Available when the molecule contains any of a list of SMARTS patterns.
///
/// Yields one match per matching pattern, in pattern order. Identifiers
/// that do not parse as SMILES have no matches.
#[derive(Default)]
pub struct AvailabilityFromSmarts {
    patterns: Vec<SmartsPattern>,
    standardizer: Option<Arc<dyn Standardizer>>,
}

impl AvailabilityFromSmarts {
    /// Compile `patterns` and create a matcher over them.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidPattern`] for the first pattern that does not compile.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|smarts| {
                let smarts = smarts.as_ref();
                SmartsPattern::parse(smarts).map_err(|err| MatchError::InvalidPattern {
                    pattern: smarts.to_string(),
                    reason: err.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_compiled(patterns))
    }

    /// Create a matcher over already compiled patterns.
    #[must_use]
    pub fn from_compiled(patterns: Vec<SmartsPattern>) -> Self {
        Self {
            patterns,
            standardizer: None,
        }
    }

    /// Standardize identifiers with `standardizer` before matching.
    #[must_use]
    pub fn with_standardizer(mut self, standardizer: Arc<dyn Standardizer>) -> Self {
        self.standardizer = Some(standardizer);
        self
    }

    /// Replace (or remove) the standardizer.
    pub fn set_standardizer(&mut self, standardizer: Option<Arc<dyn Standardizer>>) {
        self.standardizer = standardizer;
    }

    /// The compiled patterns.
    #[must_use]
    pub fn patterns(&self) -> &[SmartsPattern] {
        &self.patterns
    }
}

impl SmilesAvailability for AvailabilityFromSmarts {
    fn standardizer(&self) -> Option<&dyn Standardizer> {
        self.standardizer.as_deref()
    }

    fn find_matches_standardized(&self, smiles: String) -> MatchIter<'_> {
        if self.patterns.is_empty() {
            return no_matches();
        }
        let molecule = match parse_smiles(&smiles) {
            Ok(molecule) => molecule,
            Err(err) => {
                debug!(smiles = %smiles, error = %err, "Skipping substructure search");
                return no_matches();
            }
        };

        Box::new(
            self.patterns
                .iter()
                .filter(move |pattern| pattern.matches(&molecule))
                .map(|pattern| {
                    Ok(AvailabilityMatch::new(format!(
                        "Matching SMARTS \"{}\".",
                        pattern.as_str()
                    )))
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> AvailabilityFromSmarts {
        AvailabilityFromSmarts::new(["[O;D2]C", "[F,Cl,Br,I]"]).expect("valid SMARTS")
    }

    #[test]
    fn test_smarts_matching() {
        let matcher = matcher();
        for smiles in ["COC", "OCCBr", "F", "CF", "C1COCC1"] {
            assert!(matcher.is_available(smiles).expect("no oracle"), "{smiles}");
        }
        for smiles in ["CCO", "NON", "OCCS", "invalid"] {
            assert!(!matcher.is_available(smiles).expect("no oracle"), "{smiles}");
        }
    }

    #[test]
    fn test_one_match_per_pattern() {
        let details: Vec<String> = matcher()
            .find_matches("COCCCBr")
            .map(|record| record.expect("no oracle").details().to_string())
            .collect();
        assert_eq!(
            details,
            vec![
                "Matching SMARTS \"[O;D2]C\".".to_string(),
                "Matching SMARTS \"[F,Cl,Br,I]\".".to_string()
            ]
        );
    }

    #[test]
    fn test_invalid_smarts_is_construction_error() {
        let err = AvailabilityFromSmarts::new(["[O;D2]C", "[O"])
            .err()
            .expect("invalid SMARTS");
        assert!(matches!(err, MatchError::InvalidPattern { pattern, .. } if pattern == "[O"));
    }

    #[test]
    fn test_empty_matcher() {
        let matcher = AvailabilityFromSmarts::default();
        assert!(!matcher.is_available("CCO").expect("no oracle"));
    }
}

//! Pattern-text matcher.

use crate::availability::{MatchIter, SmilesAvailability};
use crate::error::{MatchError, Result};
use crate::record::AvailabilityMatch;
use regex::Regex;
use std::sync::Arc;
use stockroom_chem::Standardizer;

/// Available when any regex finds a match in the SMILES text.
///
/// Yields one match per matching pattern, in pattern order.
#[derive(Default)]
pub struct AvailabilityFromRegex {
    patterns: Vec<Regex>,
    standardizer: Option<Arc<dyn Standardizer>>,
}

impl AvailabilityFromRegex {
    /// Create a matcher over precompiled regexes.
    #[must_use]
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self {
            patterns,
            standardizer: None,
        }
    }

    /// Compile `patterns` and create a matcher over them.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidPattern`] for the first pattern that does not compile.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|err| MatchError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: err.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(patterns))
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
    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }
}

impl SmilesAvailability for AvailabilityFromRegex {
    fn standardizer(&self) -> Option<&dyn Standardizer> {
        self.standardizer.as_deref()
    }

    fn find_matches_standardized(&self, smiles: String) -> MatchIter<'_> {
        Box::new(
            self.patterns
                .iter()
                .filter(move |pattern| pattern.is_match(&smiles))
                .map(|pattern| {
                    Ok(AvailabilityMatch::new(format!(
                        "Matching regex \"{}\".",
                        pattern.as_str()
                    )))
                }),
        )
    }
}

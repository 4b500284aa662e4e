//! The matcher contract shared by every availability source.

use crate::error::Result;
use crate::record::AvailabilityMatch;
use stockroom_chem::Standardizer;
use tracing::warn;

/// Lazy sequence of matches produced by a matcher.
///
/// Items are `Result`s so that oracle failures reach the caller; a consumer
/// that stops early never triggers the remaining lookups.
pub type MatchIter<'a> = Box<dyn Iterator<Item = Result<AvailabilityMatch>> + 'a>;

/// A source that can tell whether a molecule is available.
///
/// Implementors provide [`find_matches_standardized`](Self::find_matches_standardized);
/// the remaining operations standardize the input first and are derived
/// from it.
pub trait SmilesAvailability: Send + Sync {
    /// Standardizer applied to identifiers before matching, if any.
    fn standardizer(&self) -> Option<&dyn Standardizer>;

    /// Matches for an identifier that is already in standard form.
    fn find_matches_standardized(&self, smiles: String) -> MatchIter<'_>;

    /// Matches for `smiles`.
    ///
    /// A standardization failure is logged and yields no matches.
    fn find_matches(&self, smiles: &str) -> MatchIter<'_> {
        match standardize_or_warn(self.standardizer(), smiles) {
            Some(standardized) => self.find_matches_standardized(standardized),
            None => no_matches(),
        }
    }

    /// First match for `smiles`, without evaluating the others.
    fn first_match(&self, smiles: &str) -> Result<Option<AvailabilityMatch>> {
        self.find_matches(smiles).next().transpose()
    }

    /// Whether `smiles` has at least one match.
    fn is_available(&self, smiles: &str) -> Result<bool> {
        Ok(self.first_match(smiles)?.is_some())
    }
}

/// Apply an optional standardizer, logging and returning `None` on failure.
pub fn standardize_or_warn(
    standardizer: Option<&dyn Standardizer>,
    smiles: &str,
) -> Option<String> {
    let Some(standardizer) = standardizer else {
        return Some(smiles.to_string());
    };
    match standardizer.standardize(smiles) {
        Ok(standardized) => Some(standardized),
        Err(err) => {
            warn!(
                smiles = %smiles,
                error = %err,
                "Could not standardize SMILES, treating as unavailable"
            );
            None
        }
    }
}

/// An empty match sequence.
#[must_use]
pub fn no_matches<'a>() -> MatchIter<'a> {
    Box::new(std::iter::empty())
}

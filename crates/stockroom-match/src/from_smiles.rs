//! Exact-set matcher.

use crate::availability::{no_matches, MatchIter, SmilesAvailability};
use crate::record::AvailabilityMatch;
use std::collections::HashSet;
use std::sync::Arc;
use stockroom_chem::Standardizer;

/// Available when the standardized identifier is one of a fixed set of SMILES.
///
/// The set is compared as given; callers store standardized SMILES in it.
#[derive(Default)]
pub struct AvailabilityFromSmiles {
    compounds: HashSet<String>,
    standardizer: Option<Arc<dyn Standardizer>>,
}

impl AvailabilityFromSmiles {
    /// Create a matcher over `compounds`.
    pub fn new<I, S>(compounds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            compounds: compounds.into_iter().map(Into::into).collect(),
            standardizer: None,
        }
    }

    /// Standardize identifiers with `standardizer` before lookup.
    #[must_use]
    pub fn with_standardizer(mut self, standardizer: Arc<dyn Standardizer>) -> Self {
        self.standardizer = Some(standardizer);
        self
    }

    /// Replace (or remove) the standardizer.
    pub fn set_standardizer(&mut self, standardizer: Option<Arc<dyn Standardizer>>) {
        self.standardizer = standardizer;
    }

    /// Number of compounds in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }

    /// Whether `smiles` is in the set, without standardizing it.
    #[must_use]
    pub fn contains(&self, smiles: &str) -> bool {
        self.compounds.contains(smiles)
    }
}

impl SmilesAvailability for AvailabilityFromSmiles {
    fn standardizer(&self) -> Option<&dyn Standardizer> {
        self.standardizer.as_deref()
    }

    fn find_matches_standardized(&self, smiles: String) -> MatchIter<'_> {
        if !self.compounds.contains(&smiles) {
            return no_matches();
        }
        let details = format!("Matching exact SMILES, \"{smiles}\".");
        Box::new(std::iter::once(Ok(AvailabilityMatch::new(details))))
    }
}

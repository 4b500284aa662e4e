//! External-lookup matcher.

use crate::availability::{MatchIter, SmilesAvailability};
use crate::error::{MatchError, Result};
use crate::oracle::AvailabilityOracle;
use crate::record::AvailabilityMatch;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use stockroom_chem::Standardizer;
use stockroom_core::PricingThreshold;

/// Available when an external oracle reports the compound within the pricing threshold.
///
/// The oracle is only consulted when the first match is requested.
pub struct AvailabilityFromDatabase {
    oracle: Arc<dyn AvailabilityOracle>,
    pricing_threshold: AtomicU32,
    standardizer: Option<Arc<dyn Standardizer>>,
}

impl AvailabilityFromDatabase {
    /// Create a matcher delegating to `oracle`.
    #[must_use]
    pub fn new(oracle: Arc<dyn AvailabilityOracle>, pricing_threshold: PricingThreshold) -> Self {
        Self {
            oracle,
            pricing_threshold: AtomicU32::new(pricing_threshold.value()),
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

    /// Current pricing threshold.
    #[must_use]
    pub fn pricing_threshold(&self) -> PricingThreshold {
        PricingThreshold::new(self.pricing_threshold.load(Ordering::Relaxed))
    }

    /// Change the pricing threshold used by subsequent lookups.
    pub fn set_pricing_threshold(&self, threshold: PricingThreshold) {
        self.pricing_threshold
            .store(threshold.value(), Ordering::Relaxed);
    }

    fn lookup(&self, smiles: &str) -> Result<Option<AvailabilityMatch>> {
        let available = self
            .oracle
            .availability(smiles, self.pricing_threshold())
            .map_err(MatchError::Oracle)?;
        Ok(available.then(|| AvailabilityMatch::new("Found in the database.")))
    }
}

impl SmilesAvailability for AvailabilityFromDatabase {
    fn standardizer(&self) -> Option<&dyn Standardizer> {
        self.standardizer.as_deref()
    }

    fn find_matches_standardized(&self, smiles: String) -> MatchIter<'_> {
        Box::new(std::iter::once_with(move || self.lookup(&smiles)).filter_map(Result::transpose))
    }
}

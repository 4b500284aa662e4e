//! External availability lookups.

use crate::error::OracleError;
use stockroom_core::PricingThreshold;

/// A catalog that can report whether a compound can be bought within a price limit.
///
/// Lookups are synchronous and may be slow; failures are reported to the
/// caller unchanged.
pub trait AvailabilityOracle: Send + Sync {
    /// Whether `smiles` is available at a price below `threshold`.
    ///
    /// # Errors
    /// Returns the backend's error if the lookup itself fails.
    fn availability(
        &self,
        smiles: &str,
        threshold: PricingThreshold,
    ) -> std::result::Result<bool, OracleError>;
}

impl<F> AvailabilityOracle for F
where
    F: Fn(&str, PricingThreshold) -> std::result::Result<bool, OracleError> + Send + Sync,
{
    fn availability(
        &self,
        smiles: &str,
        threshold: PricingThreshold,
    ) -> std::result::Result<bool, OracleError> {
        self(smiles, threshold)
    }
}

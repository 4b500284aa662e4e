//! SMILES standardization.
//!
//! A [`Standardizer`] maps a SMILES string to the form stored in the
//! availability sources, so that lookups compare like with like. Any
//! `Fn(&str) -> Result<String, ChemError>` closure is a standardizer.

use crate::error::{ChemError, Result};
use crate::smiles::parse_smiles;

/// Maps SMILES strings to a standard form.
///
/// Implementations must be idempotent: standardizing an already
/// standardized string returns it unchanged.
pub trait Standardizer: Send + Sync {
    /// Standardize one SMILES string.
    fn standardize(&self, smiles: &str) -> Result<String>;
}

impl<F> Standardizer for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn standardize(&self, smiles: &str) -> Result<String> {
        self(smiles)
    }
}

/// Validates the structure and orders fragments deterministically.
///
/// `CCO.[Na+]` and `[Na+].CCO` standardize to the same string. Atom order
/// within a fragment is kept as written. When a ring bond or branch spans a
/// `.` (`C1.C1`), the fragments cannot stand alone and are kept in written
/// order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentStandardizer;

impl Standardizer for FragmentStandardizer {
    fn standardize(&self, smiles: &str) -> Result<String> {
        let mut fragments: Vec<&str> = smiles
            .split('.')
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .collect();

        if fragments.is_empty() {
            return Err(ChemError::Standardization {
                input: smiles.to_string(),
                reason: "no structure".to_string(),
            });
        }

        let joined = fragments.join(".");
        parse_smiles(&joined).map_err(|err| ChemError::Standardization {
            input: smiles.to_string(),
            reason: err.to_string(),
        })?;

        if fragments.iter().all(|fragment| parse_smiles(fragment).is_ok()) {
            fragments.sort_unstable();
            Ok(fragments.join("."))
        } else {
            Ok(joined)
        }
    }
}

/// Reads `~` as a fragment separator before delegating.
///
/// Some reaction formats join the components of a salt with `~`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TildeSubstitution<S> {
    inner: S,
}

impl<S: Standardizer> TildeSubstitution<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// The wrapped standardizer.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Standardizer> Standardizer for TildeSubstitution<S> {
    fn standardize(&self, smiles: &str) -> Result<String> {
        self.inner.standardize(&smiles.replace('~', "."))
    }
}

/// Default standardizer used for availability lookups.
#[must_use]
pub fn default_standardizer() -> TildeSubstitution<FragmentStandardizer> {
    TildeSubstitution::new(FragmentStandardizer)
}

//! Combining several sources behind one exclusion gate.

use crate::availability::{standardize_or_warn, MatchIter, SmilesAvailability};
use crate::error::Result;
use crate::record::AvailabilityMatch;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use stockroom_chem::Standardizer;
use tracing::debug;

/// A named inclusion source.
#[derive(Clone)]
pub struct Source {
    name: String,
    matcher: Arc<dyn SmilesAvailability>,
}

impl Source {
    /// Create a source.
    pub fn new(name: impl Into<String>, matcher: Arc<dyn SmilesAvailability>) -> Self {
        Self {
            name: name.into(),
            matcher,
        }
    }

    /// Source name, written into match metadata under the provenance key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped matcher.
    #[must_use]
    pub fn matcher(&self) -> &Arc<dyn SmilesAvailability> {
        &self.matcher
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A rule that makes an identifier unavailable regardless of the sources.
#[derive(Clone)]
pub enum Exclusion {
    /// Excluded when the matcher finds any match
    Matcher(Arc<dyn SmilesAvailability>),
    /// Excluded when the predicate holds
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Exclusion {
    /// Exclusion from a plain predicate on the standardized identifier.
    pub fn predicate(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(predicate))
    }

    fn excludes(&self, smiles: &str) -> Result<bool> {
        match self {
            Self::Matcher(matcher) => matcher.is_available(smiles),
            Self::Predicate(predicate) => Ok(predicate(smiles)),
        }
    }
}

impl fmt::Debug for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matcher(_) => f.write_str("Exclusion::Matcher"),
            Self::Predicate(_) => f.write_str("Exclusion::Predicate"),
        }
    }
}

/// A match together with the index of the source that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedMatch {
    /// Index into the combiner's source list
    pub source: usize,
    /// The match itself
    pub record: AvailabilityMatch,
}

/// Matcher that checks exclusions first, then yields the matches of its
/// sources in priority order.
///
/// If any exclusion holds, no source is queried. Otherwise sources are
/// queried lazily: a caller that stops at the first match never reaches the
/// later sources.
#[derive(Default)]
pub struct AvailabilityCombiner {
    sources: Vec<Source>,
    exclusions: Vec<Exclusion>,
    source_info_key: Option<String>,
    standardizer: Option<Arc<dyn Standardizer>>,
}

impl AvailabilityCombiner {
    /// Create a combiner over `sources`, highest priority first.
    #[must_use]
    pub fn new(sources: Vec<Source>) -> Self {
        Self {
            sources,
            ..Self::default()
        }
    }

    /// Record each match's source name in its metadata under `key`.
    #[must_use]
    pub fn with_source_info_key(mut self, key: impl Into<String>) -> Self {
        self.source_info_key = Some(key.into());
        self
    }

    /// Check `exclusions`, in order, before any source.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: Vec<Exclusion>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Standardize identifiers once before the exclusions and sources see them.
    #[must_use]
    pub fn with_standardizer(mut self, standardizer: Arc<dyn Standardizer>) -> Self {
        self.standardizer = Some(standardizer);
        self
    }

    /// Replace (or remove) the standardizer.
    pub fn set_standardizer(&mut self, standardizer: Option<Arc<dyn Standardizer>>) {
        self.standardizer = standardizer;
    }

    /// The inclusion sources, highest priority first.
    #[must_use]
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Matches for `smiles`, each tagged with the index of its source.
    pub fn find_sourced_matches(
        &self,
        smiles: &str,
    ) -> Box<dyn Iterator<Item = Result<SourcedMatch>> + '_> {
        match standardize_or_warn(self.standardizer.as_deref(), smiles) {
            Some(standardized) => self.sourced_matches_standardized(standardized),
            None => Box::new(std::iter::empty()),
        }
    }

    /// First match for `smiles` with its source index.
    pub fn first_sourced_match(&self, smiles: &str) -> Result<Option<SourcedMatch>> {
        self.find_sourced_matches(smiles).next().transpose()
    }

    fn is_excluded(&self, smiles: &str) -> Result<bool> {
        for exclusion in &self.exclusions {
            if exclusion.excludes(smiles)? {
                debug!(smiles = %smiles, exclusion = ?exclusion, "Excluded from availability");
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn sourced_matches_standardized(
        &self,
        smiles: String,
    ) -> Box<dyn Iterator<Item = Result<SourcedMatch>> + '_> {
        match self.is_excluded(&smiles) {
            Ok(false) => {}
            Ok(true) => return Box::new(std::iter::empty()),
            Err(err) => return Box::new(std::iter::once(Err(err))),
        }

        let key = self.source_info_key.as_deref();
        Box::new(
            self.sources
                .iter()
                .enumerate()
                .flat_map(move |(index, source)| {
                    source.matcher.find_matches(&smiles).map(move |result| {
                        result.map(|mut record| {
                            if let Some(key) = key {
                                record.insert_info(key, Value::String(source.name.clone()));
                            }
                            SourcedMatch {
                                source: index,
                                record,
                            }
                        })
                    })
                }),
        )
    }
}

impl SmilesAvailability for AvailabilityCombiner {
    fn standardizer(&self) -> Option<&dyn Standardizer> {
        self.standardizer.as_deref()
    }

    fn find_matches_standardized(&self, smiles: String) -> MatchIter<'_> {
        Box::new(
            self.sourced_matches_standardized(smiles)
                .map(|result| result.map(|sourced| sourced.record)),
        )
    }
}

impl fmt::Debug for AvailabilityCombiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailabilityCombiner")
            .field("sources", &self.sources)
            .field("exclusions", &self.exclusions)
            .field("source_info_key", &self.source_info_key)
            .finish_non_exhaustive()
    }
}

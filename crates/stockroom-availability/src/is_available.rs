//! The availability orchestrator.

use crate::defaults::{
    common_biochemical_byproducts, default_available_compounds, default_available_regexes,
    get_compounds_from_file, DEFAULT_SMARTS_PATTERNS,
};
use crate::error::{AvailabilityError, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use stockroom_chem::{FragmentStandardizer, Standardizer, TildeSubstitution};
use stockroom_core::{
    AppConfig, AvailabilityConfig, Category, CategoryMetadata, DatabaseId, PricingThreshold,
};
use stockroom_match::{
    AvailabilityCombiner, AvailabilityFromDatabase, AvailabilityFromRegex, AvailabilityFromSmarts,
    AvailabilityFromSmiles, AvailabilityMatch, AvailabilityOracle, Exclusion, Source, SourcedMatch,
};
use tracing::{debug, info};

/// Metadata key under which each match records the name of its source.
pub const SOURCE_INFO_KEY: &str = "source";

/// Decides whether molecules are available as starting materials.
///
/// Sources are queried in priority order: default compounds, default
/// regexes, default SMARTS, user compounds and, unless materials are
/// exclusive, model compounds and catalog databases. Excluded compounds and
/// substructures take precedence over all sources.
pub struct IsAvailable {
    standardizer: Arc<dyn Standardizer>,
    are_materials_exclusive: bool,
    pricing_threshold: PricingThreshold,
    from_default_compounds: Arc<AvailabilityFromSmiles>,
    from_default_regexes: Arc<AvailabilityFromRegex>,
    from_default_smarts: Arc<AvailabilityFromSmarts>,
    from_user: Arc<AvailabilityFromSmiles>,
    from_model: Arc<AvailabilityFromSmiles>,
    from_databases: Vec<(DatabaseId, Arc<AvailabilityFromDatabase>)>,
    excluded_compounds: Arc<AvailabilityFromSmiles>,
    excluded_substructures: Arc<AvailabilityFromSmarts>,
}

impl IsAvailable {
    /// Build the orchestrator with the default standardizer.
    ///
    /// `databases` are queried in the given order.
    pub fn new(
        config: &AvailabilityConfig,
        databases: Vec<(DatabaseId, Arc<dyn AvailabilityOracle>)>,
    ) -> Result<Self> {
        Self::with_standardizer(config, databases, Arc::new(FragmentStandardizer))
    }

    /// Build the orchestrator with a custom standardizer.
    ///
    /// Queries additionally read `~` as a fragment separator. Compounds from
    /// `config.additional_compounds_path` are standardized with
    /// `standardizer`; the other configured lists are used as given.
    pub fn with_standardizer(
        config: &AvailabilityConfig,
        databases: Vec<(DatabaseId, Arc<dyn AvailabilityOracle>)>,
        standardizer: Arc<dyn Standardizer>,
    ) -> Result<Self> {
        let mut default_compounds = default_available_compounds();
        default_compounds.extend(common_biochemical_byproducts());
        if let Some(path) = &config.additional_compounds_path {
            let compounds = standardized_compounds_from_file(path, standardizer.as_ref())?;
            default_compounds.extend(compounds);
        }

        let from_databases = databases
            .into_iter()
            .map(|(id, oracle)| {
                let matcher = AvailabilityFromDatabase::new(oracle, config.pricing_threshold);
                (id, Arc::new(matcher))
            })
            .collect::<Vec<_>>();

        let inner = Arc::clone(&standardizer);
        let query_standardizer: Arc<dyn Standardizer> =
            Arc::new(TildeSubstitution::new(move |smiles: &str| inner.standardize(smiles)));

        let is_available = Self {
            standardizer: query_standardizer,
            are_materials_exclusive: config.are_materials_exclusive,
            pricing_threshold: config.pricing_threshold,
            from_default_compounds: Arc::new(AvailabilityFromSmiles::new(default_compounds)),
            from_default_regexes: Arc::new(AvailabilityFromRegex::new(
                default_available_regexes(),
            )),
            from_default_smarts: Arc::new(AvailabilityFromSmarts::new(DEFAULT_SMARTS_PATTERNS)?),
            from_user: Arc::new(AvailabilityFromSmiles::new(&config.always_available)),
            from_model: Arc::new(AvailabilityFromSmiles::new(&config.model_available)),
            from_databases,
            excluded_compounds: Arc::new(AvailabilityFromSmiles::new(&config.excluded)),
            excluded_substructures: Arc::new(AvailabilityFromSmarts::new(
                &config.avoid_substructures,
            )?),
        };

        info!(
            default_compounds = is_available.from_default_compounds.len(),
            user_compounds = is_available.from_user.len(),
            model_compounds = is_available.from_model.len(),
            databases = is_available.from_databases.len(),
            exclusive = is_available.are_materials_exclusive,
            pricing_threshold = %is_available.pricing_threshold,
            "Initialized availability sources"
        );
        Ok(is_available)
    }

    /// Build the orchestrator from application configuration, opening the
    /// catalog databases named in the database configuration file.
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        let databases = stockroom_db::initialize_databases(config.databases.config_path.as_deref())?
            .into_iter()
            .map(|(id, database)| (id, database as Arc<dyn AvailabilityOracle>))
            .collect();
        Self::new(&config.availability, databases)
    }

    /// Whether `smiles` is available.
    pub fn is_available(&self, smiles: &str) -> Result<bool> {
        match self.first_availability_match(smiles)? {
            Some((category, record)) => {
                debug!(
                    smiles = %smiles,
                    category = %category,
                    details = %record.details(),
                    "Available"
                );
                Ok(true)
            }
            None => {
                debug!(smiles = %smiles, "Not available");
                Ok(false)
            }
        }
    }

    /// Category of the highest-priority source that makes `smiles` available.
    ///
    /// [`Category::Unavailable`] if no source does.
    pub fn availability_category(&self, smiles: &str) -> Result<Category> {
        Ok(self
            .first_availability_match(smiles)?
            .map_or(Category::Unavailable, |(category, _)| category))
    }

    /// Display metadata for [`availability_category`](Self::availability_category).
    pub fn get_availability_metadata(&self, smiles: &str) -> Result<&'static CategoryMetadata> {
        Ok(self.availability_category(smiles)?.metadata())
    }

    /// Whether a retrosynthesis may expand `smiles` further.
    ///
    /// Only default compounds, default regexes and user compounds stop the
    /// expansion; default SMARTS, model compounds, databases and exclusions
    /// are not consulted.
    pub fn is_expandable(&self, smiles: &str) -> Result<bool> {
        let combiner = AvailabilityCombiner::new(vec![
            Source::new("default_compounds", self.from_default_compounds.clone()),
            Source::new("default_regexes", self.from_default_regexes.clone()),
            Source::new("user", self.from_user.clone()),
        ])
        .with_source_info_key(SOURCE_INFO_KEY)
        .with_standardizer(Arc::clone(&self.standardizer));

        let expandable = combiner.first_sourced_match(smiles)?.is_none();
        debug!(smiles = %smiles, expandable, "Checked expandability");
        Ok(expandable)
    }

    /// Pricing threshold applied to catalog databases.
    #[must_use]
    pub fn pricing_threshold(&self) -> PricingThreshold {
        self.pricing_threshold
    }

    /// Change the pricing threshold of every catalog database.
    pub fn set_pricing_threshold(&mut self, threshold: PricingThreshold) {
        self.pricing_threshold = threshold;
        for (_, database) in &self.from_databases {
            database.set_pricing_threshold(threshold);
        }
        debug!(pricing_threshold = %threshold, "Updated pricing threshold");
    }

    /// Whether user materials replace model compounds and databases.
    #[must_use]
    pub fn are_materials_exclusive(&self) -> bool {
        self.are_materials_exclusive
    }

    /// Identifiers of the configured databases, in query order.
    pub fn database_ids(&self) -> impl Iterator<Item = &DatabaseId> {
        self.from_databases.iter().map(|(id, _)| id)
    }

    /// Full priority list with the category of each source.
    fn sources(&self) -> (Vec<Source>, Vec<Category>) {
        let mut sources = vec![
            (
                Source::new("default_compounds", self.from_default_compounds.clone()),
                Category::Common,
            ),
            (
                Source::new("default_regexes", self.from_default_regexes.clone()),
                Category::Common,
            ),
            (
                Source::new("default_smarts", self.from_default_smarts.clone()),
                Category::Common,
            ),
            (Source::new("user", self.from_user.clone()), Category::Common),
        ];
        if !self.are_materials_exclusive {
            sources.push((Source::new("model", self.from_model.clone()), Category::Model));
            for (id, database) in &self.from_databases {
                sources.push((
                    Source::new(id.as_str(), database.clone()),
                    Category::for_database(id),
                ));
            }
        }
        sources.into_iter().unzip()
    }

    fn first_availability_match(
        &self,
        smiles: &str,
    ) -> Result<Option<(Category, AvailabilityMatch)>> {
        let (sources, categories) = self.sources();
        let combiner = AvailabilityCombiner::new(sources)
            .with_exclusions(vec![
                Exclusion::Matcher(self.excluded_compounds.clone()),
                Exclusion::Matcher(self.excluded_substructures.clone()),
            ])
            .with_source_info_key(SOURCE_INFO_KEY)
            .with_standardizer(Arc::clone(&self.standardizer));

        let Some(SourcedMatch { source, record }) = combiner.first_sourced_match(smiles)? else {
            return Ok(None);
        };
        let category = categories
            .get(source)
            .copied()
            .ok_or(AvailabilityError::UnknownSource { index: source })?;
        Ok(Some((category, record)))
    }
}

fn standardized_compounds_from_file(
    path: &Path,
    standardizer: &dyn Standardizer,
) -> Result<HashSet<String>> {
    get_compounds_from_file(path)?
        .iter()
        .map(|smiles| {
            standardizer
                .standardize(smiles)
                .map_err(|source| AvailabilityError::Standardization {
                    path: path.to_path_buf(),
                    source,
                })
        })
        .collect()
}

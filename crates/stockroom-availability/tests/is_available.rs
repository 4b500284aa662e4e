//! Integration tests for the availability orchestrator.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stockroom_availability::{AvailabilityError, IsAvailable};
use stockroom_core::{AppConfig, AvailabilityConfig, Category, DatabaseId, PricingThreshold};
use stockroom_db::{CatalogDatabase, Price};
use stockroom_match::{AvailabilityOracle, MatchError, OracleError};
use tempfile::TempDir;

const IBUPROFEN: &str = "CC(Cc1ccc(cc1)C(C(=O)O)C)C";
const MODEL_COMPOUND: &str = "CCCCCCCN";
const EMOLECULES_COMPOUND: &str = "CCCCCCCCO";
const IN_HOUSE_COMPOUND: &str = "CCCCCCCCCC";

fn oracle_for(
    compound: &'static str,
    calls: Arc<AtomicUsize>,
) -> Arc<dyn AvailabilityOracle> {
    Arc::new(
        move |smiles: &str, _: PricingThreshold| -> Result<bool, OracleError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(smiles == compound)
        },
    )
}

fn database_id(name: &str) -> DatabaseId {
    DatabaseId::new(name).expect("valid database id")
}

/// Orchestrator with two catalogs, returning it and the catalog call counter.
fn orchestrator(config: &AvailabilityConfig) -> (IsAvailable, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let databases = vec![
        (
            database_id("emolecules"),
            oracle_for(EMOLECULES_COMPOUND, Arc::clone(&calls)),
        ),
        (
            database_id("in_house"),
            oracle_for(IN_HOUSE_COMPOUND, Arc::clone(&calls)),
        ),
    ];
    let is_available = IsAvailable::new(config, databases).expect("valid configuration");
    (is_available, calls)
}

fn model_config() -> AvailabilityConfig {
    AvailabilityConfig {
        always_available: vec!["CCCCCC(=O)OC".to_string()],
        model_available: vec![MODEL_COMPOUND.to_string()],
        ..AvailabilityConfig::default()
    }
}

#[test]
fn test_default_compounds() {
    let (is_available, _) = orchestrator(&AvailabilityConfig::default());
    assert!(is_available.is_available("B1C2CCCC1CCC2").expect("lookup"));
    assert!(!is_available.is_available(IBUPROFEN).expect("lookup"));
    assert!(!is_available
        .is_available("C1=CC=C2C(=C1)C=CC=NN2")
        .expect("lookup"));
}

#[test]
fn test_additional_compounds_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("compounds.txt");
    fs::write(&path, format!("# in-house stock\n{IBUPROFEN}\n\nCCN(CC)C(=O)c1cccc(C)c1\n"))
        .expect("write compounds");

    let config = AvailabilityConfig {
        additional_compounds_path: Some(path),
        ..AvailabilityConfig::default()
    };
    let (is_available, _) = orchestrator(&config);
    assert!(is_available.is_available("B1C2CCCC1CCC2").expect("lookup"));
    assert!(is_available.is_available(IBUPROFEN).expect("lookup"));
    assert!(is_available
        .is_available("CCN(CC)C(=O)c1cccc(C)c1")
        .expect("lookup"));
    assert!(!is_available
        .is_available("C1=CC=C2C(=C1)C=CC=NN2")
        .expect("lookup"));
}

#[test]
fn test_invalid_additional_compounds() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("compounds.txt");
    fs::write(&path, "CCO\nnot a smiles\n").expect("write compounds");

    let config = AvailabilityConfig {
        additional_compounds_path: Some(path),
        ..AvailabilityConfig::default()
    };
    assert!(matches!(
        IsAvailable::new(&config, Vec::new()),
        Err(AvailabilityError::Standardization { .. })
    ));

    let config = AvailabilityConfig {
        additional_compounds_path: Some(dir.path().join("missing.txt")),
        ..AvailabilityConfig::default()
    };
    assert!(matches!(
        IsAvailable::new(&config, Vec::new()),
        Err(AvailabilityError::Io { .. })
    ));
}

#[test]
fn test_categories() {
    let (is_available, _) = orchestrator(&model_config());

    let category = |smiles: &str| {
        is_available
            .availability_category(smiles)
            .expect("lookup")
    };
    assert_eq!(category("O"), Category::Common);
    assert_eq!(category("S1[Fe]S[Fe]1"), Category::Common);
    assert_eq!(category("CCCCCC(=O)OC"), Category::Common);
    assert_eq!(category(MODEL_COMPOUND), Category::Model);
    assert_eq!(category(EMOLECULES_COMPOUND), Category::Emolecules);
    assert_eq!(category(IN_HOUSE_COMPOUND), Category::Database);
    assert_eq!(category("C1CCCCCCCC1"), Category::Unavailable);

    let metadata = is_available
        .get_availability_metadata(EMOLECULES_COMPOUND)
        .expect("lookup");
    assert_eq!(metadata.color, "#28a30d");
    assert_eq!(
        metadata.label,
        "Molecule commercially available on eMolecules.com"
    );

    let metadata = is_available
        .get_availability_metadata("C1CCCCCCCC1")
        .expect("lookup");
    assert_eq!(
        serde_json::to_value(metadata).expect("serialize"),
        serde_json::json!({
            "color": "#ce4e04",
            "label": "Not able to find a synthetic path"
        })
    );
}

#[test]
fn test_exclusive_materials_skip_model_and_databases() {
    let config = AvailabilityConfig {
        are_materials_exclusive: true,
        ..model_config()
    };
    let (is_available, calls) = orchestrator(&config);

    assert!(is_available.are_materials_exclusive());
    assert!(is_available.is_available("CCCCCC(=O)OC").expect("lookup"));
    assert!(!is_available.is_available(MODEL_COMPOUND).expect("lookup"));
    assert!(!is_available.is_available(EMOLECULES_COMPOUND).expect("lookup"));
    assert!(!is_available.is_available(IN_HOUSE_COMPOUND).expect("lookup"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_databases_queried_in_order_and_lazily() {
    let (is_available, calls) = orchestrator(&model_config());

    // Earlier sources answer without touching the catalogs.
    assert!(is_available.is_available("CCO").expect("lookup"));
    assert!(is_available.is_available(MODEL_COMPOUND).expect("lookup"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // First catalog answers, second is never asked.
    assert!(is_available.is_available(EMOLECULES_COMPOUND).expect("lookup"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Both catalogs are asked before giving up.
    assert!(!is_available.is_available("C1CCCCCCCC1").expect("lookup"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_exclusions_take_precedence() {
    let config = AvailabilityConfig {
        excluded: vec!["CCO".to_string()],
        avoid_substructures: vec!["[Na+]".to_string()],
        ..model_config()
    };
    let (is_available, calls) = orchestrator(&config);

    assert!(!is_available.is_available("CCO").expect("lookup"));
    assert!(!is_available.is_available("[Cl-].[Na+]").expect("lookup"));
    assert!(!is_available.is_available("CCCCCCCCO.[Na+]").expect("lookup"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(is_available.is_available("[Cl-].[K+]").expect("lookup"));
}

#[test]
fn test_is_expandable_uses_reduced_sources() {
    let config = AvailabilityConfig {
        excluded: vec!["CCO".to_string()],
        ..model_config()
    };
    let (is_available, calls) = orchestrator(&config);

    // Matched only by a default SMARTS rule.
    assert!(is_available.is_available("S1[Fe]S[Fe]1").expect("lookup"));
    assert!(is_available.is_expandable("S1[Fe]S[Fe]1").expect("lookup"));

    // Exclusions do not apply.
    assert!(!is_available.is_available("CCO").expect("lookup"));
    assert!(!is_available.is_expandable("CCO").expect("lookup"));

    // Neither do model compounds or databases.
    assert!(is_available.is_expandable(MODEL_COMPOUND).expect("lookup"));
    assert!(is_available.is_expandable(EMOLECULES_COMPOUND).expect("lookup"));
    assert!(!is_available.is_expandable("CCCCCC(=O)OC").expect("lookup"));
    assert!(!is_available.is_expandable("[Na+]").expect("lookup"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_tilde_fragment_separator() {
    let (is_available, _) = orchestrator(&AvailabilityConfig::default());
    assert!(is_available.is_available("[Na+]~[Cl-]").expect("lookup"));
    assert!(is_available.is_available("[Na+].[Cl-]").expect("lookup"));
}

#[test]
fn test_unparsable_input_is_unavailable() {
    let (is_available, calls) = orchestrator(&AvailabilityConfig::default());
    assert!(!is_available.is_available("not a smiles").expect("lookup"));
    assert!(is_available.is_expandable("not a smiles").expect("lookup"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_oracle_errors_propagate() {
    let failing: Arc<dyn AvailabilityOracle> = Arc::new(
        |_: &str, _: PricingThreshold| -> Result<bool, OracleError> {
            Err("catalog unreachable".into())
        },
    );
    let is_available = IsAvailable::new(
        &AvailabilityConfig::default(),
        vec![(database_id("emolecules"), failing)],
    )
    .expect("valid configuration");

    assert!(is_available.is_available("CCO").expect("answered by defaults"));
    let err = is_available
        .is_available("C1CCCCCCCC1")
        .expect_err("oracle failure");
    assert!(matches!(
        err,
        AvailabilityError::Match(MatchError::Oracle(_))
    ));
    assert!(is_available
        .get_availability_metadata("C1CCCCCCCC1")
        .is_err());
}

#[test]
fn test_invalid_avoided_substructure() {
    let config = AvailabilityConfig {
        avoid_substructures: vec!["[C".to_string()],
        ..AvailabilityConfig::default()
    };
    assert!(matches!(
        IsAvailable::new(&config, Vec::new()),
        Err(AvailabilityError::Match(MatchError::InvalidPattern { .. }))
    ));
}

#[test]
fn test_from_app_config_with_catalog() {
    let dir = TempDir::new().expect("temp dir");
    let catalog =
        CatalogDatabase::open(dir.path().join("emolecules.sqlite")).expect("create catalog");
    catalog
        .insert(EMOLECULES_COMPOUND, &Price::from(20.0))
        .expect("insert offer");
    catalog
        .insert(EMOLECULES_COMPOUND, &Price::from("NA"))
        .expect("insert offer");
    drop(catalog);

    let config_path = dir.path().join("databases.json");
    fs::write(
        &config_path,
        r#"{ "emolecules": { "path": "emolecules.sqlite" } }"#,
    )
    .expect("write database config");

    let mut config = AppConfig::default();
    config.databases.config_path = Some(config_path);
    config.availability.pricing_threshold = PricingThreshold::new(10);

    let mut is_available = IsAvailable::from_app_config(&config).expect("valid configuration");
    let ids: Vec<&str> = is_available.database_ids().map(DatabaseId::as_str).collect();
    assert_eq!(ids, vec!["emolecules"]);
    assert!(!is_available.is_available(EMOLECULES_COMPOUND).expect("lookup"));

    is_available.set_pricing_threshold(PricingThreshold::new(30));
    assert_eq!(
        is_available
            .availability_category(EMOLECULES_COMPOUND)
            .expect("lookup"),
        Category::Emolecules
    );

    is_available.set_pricing_threshold(PricingThreshold::new(PricingThreshold::NO_LIMIT_SENTINEL));
    assert!(is_available.is_available(EMOLECULES_COMPOUND).expect("lookup"));
}

#[test]
fn test_without_database_config() {
    let is_available = IsAvailable::from_app_config(&AppConfig::default()).expect("no databases");
    assert_eq!(is_available.database_ids().count(), 0);
    assert!(!is_available.is_available(EMOLECULES_COMPOUND).expect("lookup"));
}

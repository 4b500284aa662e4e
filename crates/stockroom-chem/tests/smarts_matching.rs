//! Integration tests for SMARTS matching against standardized SMILES.

use stockroom_chem::{default_standardizer, parse_smiles, SmartsPattern, Standardizer};

fn matches(smarts: &str, smiles: &str) -> bool {
    let pattern = SmartsPattern::parse(smarts).expect("valid SMARTS");
    let molecule = parse_smiles(smiles).expect("valid SMILES");
    pattern.matches(&molecule)
}

#[test]
fn test_ether_and_halide_patterns() {
    let ether = "[O;D2]C";
    let halide = "[F,Cl,Br,I]";

    assert!(matches(ether, "CCOCC"));
    assert!(matches(ether, "C1CCOC1"));
    assert!(!matches(ether, "CCO"));

    assert!(matches(halide, "BrCCBr"));
    assert!(matches(halide, "c1ccc(I)cc1"));
    assert!(!matches(halide, "CC(=O)O"));
}

#[test]
fn test_iron_sulfur_cluster() {
    let cluster = "S1[Fe]S[Fe]1";
    assert!(matches(cluster, "[Fe]1S[Fe]S1"));
    assert!(!matches(cluster, "[Fe]S[Fe]"));
}

#[test]
fn test_wildcard_ring_pattern() {
    // Six-membered ring of any atoms and any bonds.
    let ring = "*~1~*~*~*~*~*~1";
    assert!(matches(ring, "c1ccncc1"));
    assert!(matches(ring, "C1CCOCC1"));
    assert!(!matches(ring, "C1CCCC1"));
}

#[test]
fn test_matching_standardized_salt() {
    let standardizer = default_standardizer();
    let smiles = standardizer
        .standardize("CC(=O)[O-]~[Na+]")
        .expect("valid salt");
    assert_eq!(smiles, "CC(=O)[O-].[Na+]");
    assert!(matches("[Na+]", &smiles));
    assert!(matches("C(=O)[O-]", &smiles));
}

//! Built-in availability rules and compound list files.

use crate::error::{AvailabilityError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Regexes for compounds that are always available: simple ions, single
/// elements and diatomics.
pub const DEFAULT_REGEX_PATTERNS: [&str; 5] = [
    // Simple ions, e.g. [Na+], [Cl-], [Mg+2]
    r"^\[\w{1,3}[+-]\d?\]$",
    // One or two elements, e.g. O, Cl, CO
    r"^([A-Z][a-z]?){1,2}$",
    // The same in brackets, e.g. [Pd], [H][H]
    r"^(\[[A-Z][a-z]?\]){1,2}$",
    // e.g. [HH], [BrBr]
    r"^\[([A-Z][a-z]?){1,2}\]$",
    // Diatomics with a bond, e.g. O=O, N#N
    r"^[A-Z].?[A-Z]$",
];

/// SMARTS for biochemical cofactors (coenzyme A, NAD(P), FAD, SAM, heme, Fe-S clusters, ...).
pub const DEFAULT_SMARTS_PATTERNS: [&str; 8] = [
    "O=C(NCC*)CCNC(=O)C(O)C(C)(C)COP(=O)(*)OP(=O)(*)OC*3O*(n2cnc1c(ncnc12)N)*(O)*3OP(=O)(*)*",
    "**1*(*)*(COP(*)(=O)OP(*)(=O)OC*2O*(*)*(*)*2*)O*1*",
    "**1*(*)*(O*1COP(*)(=O)O)[R]",
    "*P(*)(=O)O*1*(*)*(*)O[*]1COP(*)(*)=O",
    "**1*(*)*(O*1CS*)[R]",
    "**1**2**3*(**(=O)**3=O)*(*)*2**1*",
    "*~1~*~*~2~*~*~1~*~*~1~*~*~*(~*~*~3~*~*~*(~*~*~4~*~*~*(~*~2)~*~4)~*~3)~*~1",
    "S1[Fe]S[Fe]1",
];

/// Common biochemical byproducts missing from commercial catalogs.
pub const COMMON_BIOCHEMICAL_BYPRODUCTS: [&str; 9] = [
    "O=P([O-])([O-])[O-]",
    "O=P([O-])([O-])O",
    "C[N+](C)(C)CCO",
    "NCCO",
    "O=P([O-])([O-])OP(=O)([O-])[O-]",
    "O=P([O-])([O-])OP(=O)([O-])O",
    "O=C([O-])CCC(=O)C(=O)[O-]",
    "CC(=O)[O-]",
    "CC(=O)C(=O)[O-]",
];

const COMMON_COMPOUNDS: &str = include_str!("../resources/common_compounds.txt");

/// Compiled [`DEFAULT_REGEX_PATTERNS`].
#[must_use]
pub fn default_available_regexes() -> Vec<Regex> {
    DEFAULT_REGEX_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid regex"))
        .collect()
}

/// Compounds shipped with the crate, in standard form.
#[must_use]
pub fn default_available_compounds() -> HashSet<String> {
    parse_compound_list(COMMON_COMPOUNDS)
        .map(str::to_string)
        .collect()
}

/// [`COMMON_BIOCHEMICAL_BYPRODUCTS`] as a set.
#[must_use]
pub fn common_biochemical_byproducts() -> HashSet<String> {
    COMMON_BIOCHEMICAL_BYPRODUCTS
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// SMILES of a compound list: one per line, skipping blank lines and `#` comments.
pub fn parse_compound_list(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Read a compound list file.
pub fn get_compounds_from_file(path: &Path) -> Result<HashSet<String>> {
    let contents = std::fs::read_to_string(path).map_err(|source| AvailabilityError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_compound_list(&contents).map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_chem::{FragmentStandardizer, SmartsPattern, Standardizer};

    #[test]
    fn test_packaged_compounds() {
        let compounds = default_available_compounds();
        assert!(compounds.contains("B1C2CCCC1CCC2"));
        assert!(compounds.contains("[Cl-].[Na+]"));
        assert!(!compounds.contains("CC(C)Cc1ccc(C(C)C(=O)O)cc1"));
        assert!(!compounds.contains("CC(Cc1ccc(cc1)C(C(=O)O)C)C"));
        assert!(compounds.iter().all(|smiles| !smiles.starts_with('#')));
    }

    #[test]
    fn test_packaged_compounds_are_standard() {
        for smiles in default_available_compounds()
            .iter()
            .chain(&common_biochemical_byproducts())
        {
            let standardized = FragmentStandardizer
                .standardize(smiles)
                .unwrap_or_else(|err| panic!("{smiles}: {err}"));
            assert_eq!(&standardized, smiles);
        }
    }

    #[test]
    fn test_default_smarts_compile() {
        for smarts in DEFAULT_SMARTS_PATTERNS {
            assert!(SmartsPattern::parse(smarts).is_ok(), "{smarts}");
        }
    }

    #[test]
    fn test_default_regexes() {
        let regexes = default_available_regexes();
        let matches = |smiles: &str| regexes.iter().any(|regex| regex.is_match(smiles));

        for smiles in [
            "[Na+]", "[Mg+2]", "O", "Cl", "CO", "[Pd]", "[H][H]", "[BrBr]", "O=O", "N#N",
        ] {
            assert!(matches(smiles), "{smiles}");
        }
        for smiles in ["CCO", "[Na]CCC", "c1ccccc1", "S1[Fe]S[Fe]1"] {
            assert!(!matches(smiles), "{smiles}");
        }
    }

    #[test]
    fn test_compound_list_parsing() {
        let contents = "# header\nCCO\n\n  CCN  \n#CCC\nCCO\n";
        let compounds: Vec<&str> = parse_compound_list(contents).collect();
        assert_eq!(compounds, vec!["CCO", "CCN", "CCO"]);
    }
}

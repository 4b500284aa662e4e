//! Periodic table lookups.

/// Element symbols indexed by atomic number minus one.
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Atomic number for an element symbol (case-sensitive, e.g. `"Cl"`).
#[must_use]
pub fn atomic_number(symbol: &str) -> Option<u8> {
    SYMBOLS
        .iter()
        .position(|s| *s == symbol)
        .and_then(|index| u8::try_from(index + 1).ok())
}

/// Element symbol for an atomic number.
#[must_use]
pub fn symbol(number: u8) -> Option<&'static str> {
    SYMBOLS.get(usize::from(number).checked_sub(1)?).copied()
}

/// Allowed valences of the SMILES organic subset, smallest first.
///
/// Empty for elements outside the organic subset, which never receive
/// implicit hydrogens.
#[must_use]
pub fn default_valences(number: u8) -> &'static [u8] {
    match number {
        5 => &[3],        // B
        6 => &[4],        // C
        7 => &[3, 5],     // N
        8 => &[2],        // O
        15 => &[3, 5],    // P
        16 => &[2, 4, 6], // S
        9 | 17 | 35 | 53 => &[1],
        _ => &[],
    }
}

/// Whether the element may be written without brackets in SMILES.
#[must_use]
pub fn is_organic_subset(number: u8) -> bool {
    !default_valences(number).is_empty()
}

/// Atomic number for a lowercase aromatic symbol (`c`, `n`, `se`, ...).
#[must_use]
pub fn aromatic_atomic_number(symbol: &str) -> Option<u8> {
    match symbol {
        "b" => Some(5),
        "c" => Some(6),
        "n" => Some(7),
        "o" => Some(8),
        "p" => Some(15),
        "s" => Some(16),
        "as" => Some(33),
        "se" => Some(34),
        "te" => Some(52),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(atomic_number("C"), Some(6));
        assert_eq!(atomic_number("Cl"), Some(17));
        assert_eq!(atomic_number("Fe"), Some(26));
        assert_eq!(atomic_number("Og"), Some(118));
        assert_eq!(atomic_number("cl"), None);
        assert_eq!(atomic_number("Xx"), None);

        assert_eq!(symbol(11), Some("Na"));
        assert_eq!(symbol(0), None);
        assert_eq!(symbol(119), None);
    }

    #[test]
    fn test_organic_subset() {
        for number in [5, 6, 7, 8, 9, 15, 16, 17, 35, 53] {
            assert!(is_organic_subset(number), "{number} is organic");
        }
        assert!(!is_organic_subset(11));
        assert_eq!(default_valences(16), &[2, 4, 6]);
    }

    #[test]
    fn test_aromatic_symbols() {
        assert_eq!(aromatic_atomic_number("c"), Some(6));
        assert_eq!(aromatic_atomic_number("se"), Some(34));
        assert_eq!(aromatic_atomic_number("f"), None);
    }
}

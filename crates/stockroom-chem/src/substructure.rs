//! Substructure search of SMARTS patterns against SMILES molecules.

use crate::molecule::{Bond, BondOrder, Molecule};
use crate::smarts::{AtomExpr, AtomPrimitive, BondExpr, BondPrimitive, SmartsPattern};

impl SmartsPattern {
    /// Whether the pattern occurs anywhere in `molecule`.
    ///
    /// A pattern without atoms matches nothing.
    #[must_use]
    pub fn matches(&self, molecule: &Molecule) -> bool {
        self.find_match(molecule).is_some()
    }

    /// First embedding of the pattern, as molecule atom indices in query atom order.
    #[must_use]
    pub fn find_match(&self, molecule: &Molecule) -> Option<Vec<usize>> {
        if self.atoms().is_empty() || self.atoms().len() > molecule.atom_count() {
            return None;
        }

        let mut search = Search {
            molecule,
            pattern: self,
            order: search_order(self),
            mapping: vec![None; self.atoms().len()],
            used: vec![false; molecule.atom_count()],
        };
        if search.extend(0) {
            search.mapping.into_iter().collect()
        } else {
            None
        }
    }
}

/// Query atoms in the order they are mapped, each with an already-mapped
/// neighbor to draw candidates from (`None` starts a new component).
fn search_order(pattern: &SmartsPattern) -> Vec<(usize, Option<usize>)> {
    let count = pattern.atoms().len();
    let mut seen = vec![false; count];
    let mut order = Vec::with_capacity(count);

    for start in 0..count {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        order.push((start, None));
        let mut stack = vec![start];
        while let Some(atom) = stack.pop() {
            for (next, _) in pattern.neighbors(atom) {
                if !seen[next] {
                    seen[next] = true;
                    order.push((next, Some(atom)));
                    stack.push(next);
                }
            }
        }
    }
    order
}

struct Search<'a> {
    molecule: &'a Molecule,
    pattern: &'a SmartsPattern,
    order: Vec<(usize, Option<usize>)>,
    mapping: Vec<Option<usize>>,
    used: Vec<bool>,
}

impl Search<'_> {
    fn extend(&mut self, depth: usize) -> bool {
        let Some(&(query, parent)) = self.order.get(depth) else {
            return true;
        };

        let candidates: Vec<usize> = match parent {
            Some(parent) => {
                let Some(anchor) = self.mapping[parent] else {
                    return false;
                };
                self.molecule.neighbors(anchor).map(|(atom, _)| atom).collect()
            }
            None => (0..self.molecule.atom_count()).collect(),
        };

        for candidate in candidates {
            if self.used[candidate] || !self.is_compatible(query, candidate) {
                continue;
            }
            self.mapping[query] = Some(candidate);
            self.used[candidate] = true;
            if self.extend(depth + 1) {
                return true;
            }
            self.mapping[query] = None;
            self.used[candidate] = false;
        }
        false
    }

    fn is_compatible(&self, query: usize, candidate: usize) -> bool {
        if !atom_matches(&self.pattern.atoms()[query], self.molecule, candidate) {
            return false;
        }
        self.pattern.neighbors(query).all(|(other, query_bond)| {
            match self.mapping[other] {
                None => true,
                Some(target) => self
                    .molecule
                    .bond_between(candidate, target)
                    .is_some_and(|bond| bond_matches(query_bond.expr.as_ref(), bond)),
            }
        })
    }
}

fn atom_matches(expr: &AtomExpr, molecule: &Molecule, index: usize) -> bool {
    match expr {
        AtomExpr::Primitive(primitive) => primitive_matches(*primitive, molecule, index),
        AtomExpr::Not(inner) => !atom_matches(inner, molecule, index),
        AtomExpr::And(terms) => terms.iter().all(|term| atom_matches(term, molecule, index)),
        AtomExpr::Or(terms) => terms.iter().any(|term| atom_matches(term, molecule, index)),
    }
}

fn primitive_matches(primitive: AtomPrimitive, molecule: &Molecule, index: usize) -> bool {
    let atom = molecule.atom(index);
    match primitive {
        AtomPrimitive::Any => true,
        AtomPrimitive::Aromatic => atom.aromatic,
        AtomPrimitive::Aliphatic => !atom.aromatic,
        AtomPrimitive::Element {
            atomic_number,
            aromatic,
        } => atom.atomic_number == atomic_number && aromatic.map_or(true, |a| a == atom.aromatic),
        AtomPrimitive::AtomicNumber(number) => atom.atomic_number == number,
        AtomPrimitive::Degree(n) => molecule.degree(index) == n,
        AtomPrimitive::TotalHydrogens(n) => molecule.total_hydrogens(index) == n,
        AtomPrimitive::Connectivity(n) => molecule.connectivity(index) == n,
        AtomPrimitive::Valence(n) => molecule.valence(index) == n,
        AtomPrimitive::Rings(None | Some(1)) => molecule.is_in_ring(index),
        AtomPrimitive::Rings(Some(0)) => !molecule.is_in_ring(index),
        AtomPrimitive::Rings(Some(n)) => molecule.ring_bond_count(index) > usize::from(n),
        AtomPrimitive::RingBonds(n) => molecule.ring_bond_count(index) == n,
        AtomPrimitive::Charge(charge) => atom.charge == charge,
        AtomPrimitive::Isotope(isotope) => atom.isotope == Some(isotope),
    }
}

fn bond_matches(expr: Option<&BondExpr>, bond: &Bond) -> bool {
    match expr {
        None => matches!(bond.order, BondOrder::Single | BondOrder::Aromatic),
        Some(BondExpr::Primitive(primitive)) => match primitive {
            BondPrimitive::Single => bond.order == BondOrder::Single,
            BondPrimitive::Double => bond.order == BondOrder::Double,
            BondPrimitive::Triple => bond.order == BondOrder::Triple,
            BondPrimitive::Quadruple => bond.order == BondOrder::Quadruple,
            BondPrimitive::Aromatic => bond.order == BondOrder::Aromatic,
            BondPrimitive::Any => true,
            BondPrimitive::Ring => bond.is_in_ring(),
        },
        Some(BondExpr::Not(inner)) => !bond_matches(Some(inner), bond),
        Some(BondExpr::And(terms)) => terms.iter().all(|term| bond_matches(Some(term), bond)),
        Some(BondExpr::Or(terms)) => terms.iter().any(|term| bond_matches(Some(term), bond)),
    }
}

#[cfg(test)]
mod tests {
    use crate::smiles::parse_smiles;
    use crate::smarts::SmartsPattern;

    fn matches(smarts: &str, smiles: &str) -> bool {
        let pattern = SmartsPattern::parse(smarts).expect("valid SMARTS");
        let molecule = parse_smiles(smiles).expect("valid SMILES");
        pattern.matches(&molecule)
    }

    #[test]
    fn test_atom_primitives() {
        assert!(matches("[O;H1]", "CCO"));
        assert!(!matches("[O;H1]", "COC"));
        assert!(matches("[O;D2]C", "COC"));
        assert!(!matches("[O;D2]C", "CCO"));
        assert!(matches("[F,Cl,Br,I]", "CCCl"));
        assert!(!matches("[F,Cl,Br,I]", "CCO"));
        assert!(matches("[Na+]", "[Na+].[Cl-]"));
        assert!(!matches("[Na+]", "[Na]"));
        assert!(matches("[#8]", "O=C=O"));
        assert!(matches("[CH3]", "CC"));
        assert!(matches("[13C]", "[13CH4]"));
        assert!(matches("[X4]", "CC"));
        assert!(matches("[v4]", "C=C"));
    }

    #[test]
    fn test_hydrogen_atoms() {
        assert!(matches("[2H]", "[2H]C"));
        assert!(!matches("[2H]", "C"));
        assert!(matches("[2H]C", "[2H]C([2H])([2H])O"));
        assert!(matches("[H+]", "[H+]"));
        assert!(matches("[H]", "[H][H]"));
        assert!(!matches("[H]", "CC"));
        assert!(matches("[C;H3]", "CC"));
        assert!(matches("[OH]", "CCO"));
    }

    #[test]
    fn test_aromaticity() {
        assert!(matches("c1ccccc1", "c1ccccc1"));
        assert!(!matches("c1ccccc1", "C1CCCCC1"));
        assert!(!matches("CC", "c1ccccc1"));
        assert!(matches("[cH]", "c1ccccc1"));
        assert!(matches("a:a", "c1ccncc1"));
        assert!(matches("[#6]~[#6]", "c1ccccc1"));
    }

    #[test]
    fn test_bonds() {
        assert!(matches("C=O", "CC(=O)O"));
        assert!(!matches("C=O", "CCO"));
        assert!(matches("C#N", "CC#N"));
        assert!(matches("C!=C", "CCC"));
        assert!(matches("*~*", "C=O"));
        assert!(matches("C@C", "C1CCCCC1"));
        assert!(!matches("C@C", "CCCCCC"));
    }

    #[test]
    fn test_rings() {
        assert!(matches("C1CCCCC1", "C1CCCCC1"));
        assert!(!matches("C1CCCCC1", "CCCCCC"));
        assert!(matches("[R]", "C1CC1"));
        assert!(!matches("[R]", "CCC"));
        assert!(matches("[R0]", "CC1CC1"));
        assert!(matches("[x3]", "C1CC2CCC1C2"));
        assert!(matches("S1[Fe]S[Fe]1", "S1[Fe]S[Fe]1"));
    }

    #[test]
    fn test_disconnected_pattern() {
        assert!(matches("[Na+].[Cl-]", "[Cl-].[Na+]"));
        assert!(!matches("C.C", "C"));
        assert!(matches("O.O", "CO.OC"));
    }

    #[test]
    fn test_empty_pattern_matches_nothing() {
        assert!(!matches("", "CCO"));
    }

    #[test]
    fn test_find_match_maps_distinct_atoms() {
        let pattern = SmartsPattern::parse("CCO").expect("valid SMARTS");
        let molecule = parse_smiles("OCC").expect("valid SMILES");
        let mapping = pattern.find_match(&molecule).expect("embedding");
        assert_eq!(mapping, vec![2, 1, 0]);
    }
}

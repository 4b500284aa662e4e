//! SMILES reader.
//!
//! Supports the organic subset, bracket atoms (isotope, chirality, hydrogen
//! count, charge, atom class), explicit bonds, branches, ring closures
//! (including `%nn`) and disconnected fragments. Stereo markers are accepted
//! and ignored. Aromaticity is taken as written: no perception or
//! kekulization is performed.

use crate::element;
use crate::error::{ChemError, Result};
use crate::molecule::{Atom, BondOrder, Molecule, MoleculeBuilder};
use std::collections::BTreeMap;

/// Parse a SMILES string into a [`Molecule`].
///
/// The empty string is a valid SMILES denoting the empty molecule.
///
/// # Errors
/// Returns [`ChemError::Smiles`] for malformed input, unclosed rings or
/// branches, and atoms exceeding their allowed valence.
pub fn parse_smiles(input: &str) -> Result<Molecule> {
    SmilesParser::new(input).parse()
}

/// Whether a string parses as SMILES.
#[must_use]
pub fn is_valid_smiles(input: &str) -> bool {
    parse_smiles(input).is_ok()
}

struct SmilesParser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    builder: MoleculeBuilder,
    previous: Option<usize>,
    pending_bond: Option<BondOrder>,
    branches: Vec<usize>,
    rings: BTreeMap<u32, (usize, Option<BondOrder>)>,
}

impl<'a> SmilesParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            builder: MoleculeBuilder::default(),
            previous: None,
            pending_bond: None,
            branches: Vec::new(),
            rings: BTreeMap::new(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> ChemError {
        ChemError::Smiles {
            input: self.input.to_string(),
            position: self.pos,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn parse(mut self) -> Result<Molecule> {
        while let Some(c) = self.peek() {
            match c {
                b'(' => {
                    let Some(previous) = self.previous else {
                        return Err(self.error("branch without preceding atom"));
                    };
                    if self.pending_bond.is_some() {
                        return Err(self.error("bond before branch"));
                    }
                    self.branches.push(previous);
                    self.pos += 1;
                }
                b')' => {
                    if self.pending_bond.is_some() {
                        return Err(self.error("bond at end of branch"));
                    }
                    let Some(atom) = self.branches.pop() else {
                        return Err(self.error("unmatched ')'"));
                    };
                    self.previous = Some(atom);
                    self.pos += 1;
                }
                b'.' => {
                    if self.pending_bond.is_some() {
                        return Err(self.error("bond before '.'"));
                    }
                    self.previous = None;
                    self.pos += 1;
                }
                b'-' | b'=' | b'#' | b'$' | b':' | b'/' | b'\\' => {
                    if self.previous.is_none() {
                        return Err(self.error("bond without preceding atom"));
                    }
                    if self.pending_bond.is_some() {
                        return Err(self.error("two consecutive bonds"));
                    }
                    self.pending_bond = Some(match c {
                        b'=' => BondOrder::Double,
                        b'#' => BondOrder::Triple,
                        b'$' => BondOrder::Quadruple,
                        b':' => BondOrder::Aromatic,
                        _ => BondOrder::Single,
                    });
                    self.pos += 1;
                }
                b'0'..=b'9' | b'%' => self.ring_closure()?,
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.push_atom(atom)?;
                }
                b'*' => {
                    self.pos += 1;
                    self.push_atom(Atom::organic(0, false))?;
                }
                _ => {
                    let atom = self.organic_atom()?;
                    self.push_atom(atom)?;
                }
            }
        }

        if self.pending_bond.is_some() {
            return Err(self.error("bond at end of input"));
        }
        if !self.branches.is_empty() {
            return Err(self.error("unclosed branch"));
        }
        if let Some(number) = self.rings.keys().next() {
            return Err(self.error(format!("unclosed ring bond {number}")));
        }

        let position = self.pos;
        let input = self.input.to_string();
        self.builder.finish().map_err(|reason| ChemError::Smiles {
            input,
            position,
            reason,
        })
    }

    fn default_bond(&self, a: usize, b: usize) -> BondOrder {
        if self.builder.is_aromatic(a) && self.builder.is_aromatic(b) {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn push_atom(&mut self, atom: Atom) -> Result<()> {
        let index = self.builder.add_atom(atom);
        if let Some(previous) = self.previous {
            let order = self
                .pending_bond
                .take()
                .unwrap_or_else(|| self.default_bond(previous, index));
            self.builder
                .add_bond(previous, index, order)
                .map_err(|reason| self.error(reason))?;
        }
        self.previous = Some(index);
        Ok(())
    }

    fn ring_closure(&mut self) -> Result<()> {
        let Some(atom) = self.previous else {
            return Err(self.error("ring bond without preceding atom"));
        };
        let number = self.ring_number()?;
        let bond = self.pending_bond.take();

        match self.rings.remove(&number) {
            Some((opening, opening_bond)) => {
                let order = match (opening_bond, bond) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(self.error(format!("conflicting bonds for ring {number}")));
                    }
                    (Some(order), _) | (None, Some(order)) => order,
                    (None, None) => self.default_bond(opening, atom),
                };
                self.builder
                    .add_bond(opening, atom, order)
                    .map_err(|reason| self.error(reason))?;
            }
            None => {
                self.rings.insert(number, (atom, bond));
            }
        }
        Ok(())
    }

    fn ring_number(&mut self) -> Result<u32> {
        if self.peek() == Some(b'%') {
            self.pos += 1;
            let digits = self.take_digits();
            if digits.len() != 2 {
                return Err(self.error("'%' must be followed by two digits"));
            }
            return digits
                .parse()
                .map_err(|_| self.error("invalid ring number"));
        }
        let digit = self.peek().map_or(0, |c| u32::from(c - b'0'));
        self.pos += 1;
        Ok(digit)
    }

    fn take_digits(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let input = self.input;
        &input[start..self.pos]
    }

    fn organic_atom(&mut self) -> Result<Atom> {
        let rest = &self.input[self.pos..];

        for symbol in ["Cl", "Br"] {
            if rest.starts_with(symbol) {
                self.pos += 2;
                let number = element::atomic_number(symbol).unwrap_or(0);
                return Ok(Atom::organic(number, false));
            }
        }

        let c = self.peek().unwrap_or(b' ');
        let symbol = char::from(c).to_string();
        if c.is_ascii_uppercase() {
            if let Some(number) =
                element::atomic_number(&symbol).filter(|&n| element::is_organic_subset(n))
            {
                self.pos += 1;
                return Ok(Atom::organic(number, false));
            }
        } else if let Some(number) =
            element::aromatic_atomic_number(&symbol).filter(|&n| element::is_organic_subset(n))
        {
            self.pos += 1;
            return Ok(Atom::organic(number, true));
        }

        Err(self.error(format!("unexpected character '{}'", char::from(c))))
    }

    fn bracket_atom(&mut self) -> Result<Atom> {
        self.pos += 1; // '['

        let isotope = match self.take_digits() {
            "" => None,
            digits => Some(
                digits
                    .parse::<u16>()
                    .map_err(|_| self.error("isotope out of range"))?,
            ),
        };

        let (atomic_number, aromatic) = self.bracket_symbol()?;
        self.skip_chirality();

        let mut hydrogens = 0;
        if self.peek() == Some(b'H') {
            self.pos += 1;
            hydrogens = match self.take_digits() {
                "" => 1,
                digits => digits
                    .parse::<u8>()
                    .map_err(|_| self.error("hydrogen count out of range"))?,
            };
        }

        let charge = self.charge()?;

        if self.peek() == Some(b':') {
            self.pos += 1;
            if self.take_digits().is_empty() {
                return Err(self.error("atom class must be a number"));
            }
        }

        if self.peek() != Some(b']') {
            return Err(self.error("expected ']'"));
        }
        self.pos += 1;

        Ok(Atom {
            atomic_number,
            aromatic,
            charge,
            isotope,
            hydrogens,
            bracket: true,
        })
    }

    fn bracket_symbol(&mut self) -> Result<(u8, bool)> {
        let rest = &self.input[self.pos..];

        if rest.starts_with('*') {
            self.pos += 1;
            return Ok((0, false));
        }

        for len in [2, 1] {
            let Some(candidate) = rest.get(..len) else {
                continue;
            };
            if let Some(number) = element::aromatic_atomic_number(candidate) {
                self.pos += len;
                return Ok((number, true));
            }
            if candidate.starts_with(|c: char| c.is_ascii_uppercase()) {
                if let Some(number) = element::atomic_number(candidate) {
                    self.pos += len;
                    return Ok((number, false));
                }
            }
        }

        Err(self.error("expected element symbol"))
    }

    fn skip_chirality(&mut self) {
        if self.peek() != Some(b'@') {
            return;
        }
        while self.peek() == Some(b'@') {
            self.pos += 1;
        }
        let rest = &self.input[self.pos..];
        if ["TH", "AL", "SP", "TB", "OH"]
            .iter()
            .any(|class| rest.starts_with(class))
        {
            self.pos += 2;
            self.take_digits();
        }
    }

    fn charge(&mut self) -> Result<i8> {
        let sign: i8 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        let symbol = self.peek();
        self.pos += 1;

        let digits = self.take_digits();
        if !digits.is_empty() {
            let magnitude = digits
                .parse::<i8>()
                .map_err(|_| self.error("charge out of range"))?;
            return Ok(sign * magnitude);
        }

        let mut magnitude: i8 = 1;
        while self.peek() == symbol {
            self.pos += 1;
            magnitude = magnitude.saturating_add(1);
        }
        Ok(sign * magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_chain() {
        let ethanol = parse_smiles("CCO").expect("valid SMILES");
        assert_eq!(ethanol.atom_count(), 3);
        assert_eq!(ethanol.bonds().len(), 2);
        assert_eq!(ethanol.total_hydrogens(0), 3);
        assert_eq!(ethanol.total_hydrogens(2), 1);
        assert_eq!(ethanol.degree(1), 2);
    }

    #[test]
    fn test_branches_and_bonds() {
        let acetic_acid = parse_smiles("CC(=O)O").expect("valid SMILES");
        assert_eq!(acetic_acid.degree(1), 3);
        assert_eq!(
            acetic_acid.bond_between(1, 2).expect("C=O bond").order,
            BondOrder::Double
        );
        assert_eq!(acetic_acid.total_hydrogens(2), 0);
        assert_eq!(acetic_acid.total_hydrogens(3), 1);
    }

    #[test]
    fn test_aromatic_ring() {
        let benzene = parse_smiles("c1ccccc1").expect("valid SMILES");
        assert_eq!(benzene.bonds().len(), 6);
        assert!(benzene
            .bonds()
            .iter()
            .all(|bond| bond.order == BondOrder::Aromatic && bond.is_in_ring()));
        assert_eq!(benzene.total_hydrogens(0), 1);
        assert_eq!(benzene.valence(0), 4);

        let pyridine = parse_smiles("c1ccncc1").expect("valid SMILES");
        assert_eq!(pyridine.total_hydrogens(3), 0);

        let pyrrole = parse_smiles("c1cc[nH]c1").expect("valid SMILES");
        assert_eq!(pyrrole.total_hydrogens(3), 1);
    }

    #[test]
    fn test_bracket_atoms() {
        let salt = parse_smiles("[Na+].[Cl-]").expect("valid SMILES");
        assert_eq!(salt.atom_count(), 2);
        assert!(salt.bonds().is_empty());
        assert_eq!(salt.atom(0).atomic_number, 11);
        assert_eq!(salt.atom(0).charge, 1);
        assert_eq!(salt.atom(1).charge, -1);

        let labelled = parse_smiles("[13CH3][C@@H](O)[Fe+2]").expect("valid SMILES");
        assert_eq!(labelled.atom(0).isotope, Some(13));
        assert_eq!(labelled.total_hydrogens(0), 3);
        assert_eq!(labelled.total_hydrogens(1), 1);
        assert_eq!(labelled.atom(3).charge, 2);

        let peroxide = parse_smiles("[O--]").expect("valid SMILES");
        assert_eq!(peroxide.atom(0).charge, -2);
    }

    #[test]
    fn test_ring_closures() {
        let bicycle = parse_smiles("B1C2CCCC1CCC2").expect("valid SMILES");
        assert_eq!(bicycle.atom_count(), 9);
        assert_eq!(bicycle.bonds().len(), 10);
        assert!((0..9).all(|atom| bicycle.is_in_ring(atom)));

        let percent = parse_smiles("C%10CC%10").expect("valid SMILES");
        assert_eq!(percent.bonds().len(), 3);

        let double_closure = parse_smiles("C=1CC1").expect("valid SMILES");
        assert_eq!(
            double_closure.bond_between(0, 2).expect("ring bond").order,
            BondOrder::Double
        );
    }

    #[test]
    fn test_empty_smiles() {
        let empty = parse_smiles("").expect("empty SMILES is valid");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_invalid_smiles() {
        for invalid in [
            "invalid",
            "C1CC",
            "CC(",
            "C)C",
            "C==C",
            "=C",
            "CC=",
            "[Na",
            "[Xx]",
            "c",
            "C(C)(C)(C)(C)C",
            "C~O",
            "C1CC11",
        ] {
            assert!(parse_smiles(invalid).is_err(), "{invalid} should be rejected");
        }
    }

    #[test]
    fn test_error_position() {
        let err = parse_smiles("CC?C").expect_err("unexpected character");
        assert!(matches!(err, ChemError::Smiles { position: 2, .. }));
    }
}

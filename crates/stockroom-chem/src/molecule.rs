//! Molecular graph built from SMILES.

use crate::element;
use std::collections::VecDeque;

/// Order of a bond between two atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondOrder {
    /// `-`, or implicit between aliphatic atoms
    Single,
    /// `=`
    Double,
    /// `#`
    Triple,
    /// `$`
    Quadruple,
    /// `:`, or implicit between aromatic atoms
    Aromatic,
}

impl BondOrder {
    /// Contribution of the bond to each end's valence.
    ///
    /// Aromatic bonds count as single bonds; aromatic atoms account for the
    /// shared pi electron separately.
    #[must_use]
    pub fn valence_contribution(self) -> u8 {
        match self {
            Self::Single | Self::Aromatic => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Quadruple => 4,
        }
    }
}

/// A single atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// Atomic number
    pub atomic_number: u8,
    /// Written in lowercase (aromatic)
    pub aromatic: bool,
    /// Formal charge
    pub charge: i8,
    /// Mass number, if given
    pub isotope: Option<u16>,
    /// Attached hydrogens, explicit (bracket atoms) or implicit
    pub hydrogens: u8,
    /// Written as a bracket atom
    pub bracket: bool,
}

impl Atom {
    /// Organic-subset atom whose hydrogens are filled in when the molecule is finished.
    #[must_use]
    pub fn organic(atomic_number: u8, aromatic: bool) -> Self {
        Self {
            atomic_number,
            aromatic,
            charge: 0,
            isotope: None,
            hydrogens: 0,
            bracket: false,
        }
    }

    /// Element symbol.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        element::symbol(self.atomic_number).unwrap_or("*")
    }
}

/// A bond between two atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bond {
    /// First atom index
    pub begin: usize,
    /// Second atom index
    pub end: usize,
    /// Bond order
    pub order: BondOrder,
    in_ring: bool,
}

impl Bond {
    /// Whether the bond belongs to a ring.
    #[must_use]
    pub fn is_in_ring(&self) -> bool {
        self.in_ring
    }

    /// The atom at the other end of the bond.
    #[must_use]
    pub fn other(&self, atom: usize) -> usize {
        if self.begin == atom {
            self.end
        } else {
            self.begin
        }
    }
}

/// Molecular graph with derived ring and hydrogen information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<usize>>,
}

impl Molecule {
    /// Number of atoms.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the molecule has no atoms (the empty SMILES).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// All atoms.
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// All bonds.
    #[must_use]
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Atom by index.
    #[must_use]
    pub fn atom(&self, index: usize) -> &Atom {
        &self.atoms[index]
    }

    /// Neighbors of an atom together with the connecting bond.
    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item = (usize, &Bond)> + '_ {
        self.adjacency[atom].iter().map(move |&bond| {
            let bond = &self.bonds[bond];
            (bond.other(atom), bond)
        })
    }

    /// Bond between two atoms, if any.
    #[must_use]
    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.neighbors(a)
            .find(|(neighbor, _)| *neighbor == b)
            .map(|(_, bond)| bond)
    }

    /// Number of explicit connections (SMARTS `D`).
    #[must_use]
    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// Total attached hydrogens (SMARTS `H`).
    #[must_use]
    pub fn total_hydrogens(&self, atom: usize) -> usize {
        usize::from(self.atoms[atom].hydrogens)
    }

    /// Total connections including hydrogens (SMARTS `X`).
    #[must_use]
    pub fn connectivity(&self, atom: usize) -> usize {
        self.degree(atom) + self.total_hydrogens(atom)
    }

    /// Total bond order including hydrogens (SMARTS `v`).
    #[must_use]
    pub fn valence(&self, atom: usize) -> usize {
        let atom_ref = &self.atoms[atom];
        let explicit = self.bond_order_sum(atom) + self.total_hydrogens(atom);
        // Unbracketed aromatic atoms share one extra bond with the ring when
        // their lowest valence leaves room for it.
        let shares_pi = atom_ref.aromatic
            && !atom_ref.bracket
            && element::default_valences(atom_ref.atomic_number)
                .first()
                .is_some_and(|&lowest| explicit < usize::from(lowest));
        explicit + usize::from(shares_pi)
    }

    /// Number of ring bonds at an atom (SMARTS `x`).
    #[must_use]
    pub fn ring_bond_count(&self, atom: usize) -> usize {
        self.neighbors(atom)
            .filter(|(_, bond)| bond.is_in_ring())
            .count()
    }

    /// Whether the atom belongs to a ring (SMARTS `R`).
    #[must_use]
    pub fn is_in_ring(&self, atom: usize) -> bool {
        self.ring_bond_count(atom) > 0
    }

    fn bond_order_sum(&self, atom: usize) -> usize {
        self.neighbors(atom)
            .map(|(_, bond)| usize::from(bond.order.valence_contribution()))
            .sum()
    }

    /// Whether `a` and `b` stay connected when `skip` is removed.
    fn connected_without(&self, a: usize, b: usize, skip: usize) -> bool {
        let mut seen = vec![false; self.atoms.len()];
        let mut queue = VecDeque::from([a]);
        seen[a] = true;

        while let Some(current) = queue.pop_front() {
            if current == b {
                return true;
            }
            for &bond in &self.adjacency[current] {
                if bond == skip {
                    continue;
                }
                let next = self.bonds[bond].other(current);
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }
}

/// Incremental construction of a [`Molecule`], used by the SMILES parser.
#[derive(Debug, Default)]
pub(crate) struct MoleculeBuilder {
    molecule: Molecule,
}

impl MoleculeBuilder {
    pub(crate) fn add_atom(&mut self, atom: Atom) -> usize {
        self.molecule.atoms.push(atom);
        self.molecule.adjacency.push(Vec::new());
        self.molecule.atoms.len() - 1
    }

    pub(crate) fn is_aromatic(&self, atom: usize) -> bool {
        self.molecule.atoms[atom].aromatic
    }

    pub(crate) fn add_bond(
        &mut self,
        begin: usize,
        end: usize,
        order: BondOrder,
    ) -> Result<(), String> {
        if begin == end {
            return Err(format!("atom {begin} bonded to itself"));
        }
        if self.molecule.bond_between(begin, end).is_some() {
            return Err(format!("duplicate bond between atoms {begin} and {end}"));
        }

        let index = self.molecule.bonds.len();
        self.molecule.bonds.push(Bond {
            begin,
            end,
            order,
            in_ring: false,
        });
        self.molecule.adjacency[begin].push(index);
        self.molecule.adjacency[end].push(index);
        Ok(())
    }

    /// Perceive rings, fill implicit hydrogens and check valences.
    pub(crate) fn finish(mut self) -> Result<Molecule, String> {
        let ring_flags: Vec<bool> = self
            .molecule
            .bonds
            .iter()
            .enumerate()
            .map(|(index, bond)| self.molecule.connected_without(bond.begin, bond.end, index))
            .collect();
        for (bond, in_ring) in self.molecule.bonds.iter_mut().zip(ring_flags) {
            bond.in_ring = in_ring;
        }

        for index in 0..self.molecule.atoms.len() {
            let hydrogens = self.check_atom(index)?;
            self.molecule.atoms[index].hydrogens = hydrogens;
        }

        Ok(self.molecule)
    }

    /// Validate one atom and return its total hydrogen count.
    fn check_atom(&self, index: usize) -> Result<u8, String> {
        let molecule = &self.molecule;
        let atom = &molecule.atoms[index];

        if atom.aromatic && !molecule.is_in_ring(index) {
            return Err(format!("non-ring atom {index} marked aromatic"));
        }

        let valences = element::default_valences(atom.atomic_number);
        let bond_sum = molecule.bond_order_sum(index);

        if atom.bracket {
            let total = bond_sum + usize::from(atom.hydrogens);
            if let Some(&max) = valences.last() {
                if atom.charge == 0 && total > usize::from(max) {
                    return Err(format!(
                        "explicit valence {total} of {} atom {index} exceeds {max}",
                        atom.symbol()
                    ));
                }
            }
            return Ok(atom.hydrogens);
        }

        if valences.is_empty() {
            // Unbracketed wildcard `*`.
            return Ok(0);
        }

        if atom.aromatic {
            // Aromatic atoms use their lowest valence; the ring donates one bond.
            let used = bond_sum + 1;
            let target = usize::from(valences[0]);
            return Ok(u8::try_from(target.saturating_sub(used)).unwrap_or(0));
        }

        match valences.iter().map(|&v| usize::from(v)).find(|&v| v >= bond_sum) {
            Some(target) => Ok(u8::try_from(target - bond_sum).unwrap_or(0)),
            None => Err(format!(
                "explicit valence {bond_sum} of {} atom {index} exceeds {}",
                atom.symbol(),
                valences.last().copied().unwrap_or(0)
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(orders: &[BondOrder]) -> Molecule {
        let mut builder = MoleculeBuilder::default();
        let mut previous = builder.add_atom(Atom::organic(6, false));
        for order in orders {
            let next = builder.add_atom(Atom::organic(6, false));
            builder
                .add_bond(previous, next, *order)
                .expect("bond between distinct atoms");
            previous = next;
        }
        builder.finish().expect("valid chain")
    }

    #[test]
    fn test_implicit_hydrogens() {
        let ethane = chain(&[BondOrder::Single]);
        assert_eq!(ethane.total_hydrogens(0), 3);

        let ethene = chain(&[BondOrder::Double]);
        assert_eq!(ethene.total_hydrogens(0), 2);

        let ethyne = chain(&[BondOrder::Triple]);
        assert_eq!(ethyne.total_hydrogens(1), 1);
        assert_eq!(ethyne.connectivity(1), 2);
        assert_eq!(ethyne.valence(1), 4);
    }

    #[test]
    fn test_ring_perception() {
        let mut builder = MoleculeBuilder::default();
        let atoms: Vec<usize> = (0..4)
            .map(|_| builder.add_atom(Atom::organic(6, false)))
            .collect();
        builder.add_bond(atoms[0], atoms[1], BondOrder::Single).expect("bond");
        builder.add_bond(atoms[1], atoms[2], BondOrder::Single).expect("bond");
        builder.add_bond(atoms[2], atoms[0], BondOrder::Single).expect("bond");
        builder.add_bond(atoms[2], atoms[3], BondOrder::Single).expect("bond");
        let molecule = builder.finish().expect("valid molecule");

        assert!(molecule.is_in_ring(0));
        assert!(molecule.is_in_ring(2));
        assert!(!molecule.is_in_ring(3));
        assert_eq!(molecule.ring_bond_count(2), 2);
        assert!(!molecule.bond_between(2, 3).expect("bond").is_in_ring());
    }

    #[test]
    fn test_duplicate_bond_rejected() {
        let mut builder = MoleculeBuilder::default();
        let a = builder.add_atom(Atom::organic(6, false));
        let b = builder.add_atom(Atom::organic(6, false));
        builder.add_bond(a, b, BondOrder::Single).expect("first bond");
        assert!(builder.add_bond(b, a, BondOrder::Single).is_err());
        assert!(builder.add_bond(a, a, BondOrder::Single).is_err());
    }

    #[test]
    fn test_aromatic_atom_outside_ring_rejected() {
        let mut builder = MoleculeBuilder::default();
        builder.add_atom(Atom::organic(6, true));
        assert!(builder.finish().is_err());
    }
}

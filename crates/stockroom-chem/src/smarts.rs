//! SMARTS patterns.
//!
//! Supported: bare organic-subset atoms, `*`, `a`, `A`, bracket atom
//! expressions with `!`, `&`, `,` and `;` over the primitives `#n`, element
//! symbols, isotope, `D`, `H`, `X`, `v`, `R`, `x`, charge and (ignored)
//! chirality; bond expressions over `- = # $ : ~ @ / \` with the same
//! operators; branches, ring closures and `.`-separated components.
//! Recursive SMARTS (`$(...)`), ring sizes (`r`) and implicit-hydrogen
//! counts (`h`) are rejected.

use crate::element;
use crate::error::{ChemError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single atom test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomPrimitive {
    /// `*`
    Any,
    /// `a`
    Aromatic,
    /// `A`
    Aliphatic,
    /// Element symbol; `aromatic` is `Some(true)` for lowercase symbols and
    /// `Some(false)` for uppercase ones
    Element {
        /// Atomic number
        atomic_number: u8,
        /// Required aromaticity
        aromatic: Option<bool>,
    },
    /// `#n`
    AtomicNumber(u8),
    /// `Dn`: explicit connections
    Degree(usize),
    /// `Hn`: total hydrogens
    TotalHydrogens(usize),
    /// `Xn`: total connections
    Connectivity(usize),
    /// `vn`: total bond order
    Valence(usize),
    /// `R` (in a ring), `R0` (not in a ring) or `Rn`
    ///
    /// `Rn` for `n >= 2` is approximated as "at least `n + 1` ring bonds",
    /// which holds for ordinary fused systems.
    Rings(Option<u8>),
    /// `xn`: ring bonds
    RingBonds(usize),
    /// `+n` / `-n`
    Charge(i8),
    /// Leading mass number
    Isotope(u16),
}

/// Boolean combination of atom tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomExpr {
    /// Single test
    Primitive(AtomPrimitive),
    /// `!`
    Not(Box<AtomExpr>),
    /// `&`, `;` or juxtaposition
    And(Vec<AtomExpr>),
    /// `,`
    Or(Vec<AtomExpr>),
}

/// A single bond test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondPrimitive {
    /// `-` (also `/` and `\`)
    Single,
    /// `=`
    Double,
    /// `#`
    Triple,
    /// `$`
    Quadruple,
    /// `:`
    Aromatic,
    /// `~`
    Any,
    /// `@`
    Ring,
}

/// Boolean combination of bond tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BondExpr {
    /// Single test
    Primitive(BondPrimitive),
    /// `!`
    Not(Box<BondExpr>),
    /// `&`, `;` or juxtaposition
    And(Vec<BondExpr>),
    /// `,`
    Or(Vec<BondExpr>),
}

/// A bond of the query graph.
///
/// `expr` is `None` when no bond was written, which matches single or
/// aromatic bonds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBond {
    /// First query atom
    pub begin: usize,
    /// Second query atom
    pub end: usize,
    /// Bond test
    pub expr: Option<BondExpr>,
}

impl QueryBond {
    /// The query atom at the other end of the bond.
    #[must_use]
    pub fn other(&self, atom: usize) -> usize {
        if self.begin == atom {
            self.end
        } else {
            self.begin
        }
    }
}

/// A compiled SMARTS pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartsPattern {
    source: String,
    atoms: Vec<AtomExpr>,
    bonds: Vec<QueryBond>,
    adjacency: Vec<Vec<usize>>,
}

impl SmartsPattern {
    /// Compile a SMARTS string.
    ///
    /// # Errors
    /// Returns [`ChemError::Smarts`] for malformed or unsupported patterns.
    pub fn parse(source: &str) -> Result<Self> {
        SmartsParser::new(source).parse()
    }

    /// The SMARTS string this pattern was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Atom expressions of the query.
    #[must_use]
    pub fn atoms(&self) -> &[AtomExpr] {
        &self.atoms
    }

    /// Bonds of the query.
    #[must_use]
    pub fn bonds(&self) -> &[QueryBond] {
        &self.bonds
    }

    /// Neighbors of a query atom together with the connecting bond.
    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item = (usize, &QueryBond)> + '_ {
        self.adjacency[atom].iter().map(move |&bond| {
            let bond = &self.bonds[bond];
            (bond.other(atom), bond)
        })
    }
}

impl FromStr for SmartsPattern {
    type Err = ChemError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SmartsPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct SmartsParser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    atoms: Vec<AtomExpr>,
    bonds: Vec<QueryBond>,
    adjacency: Vec<Vec<usize>>,
    previous: Option<usize>,
    pending_bond: Option<BondExpr>,
    branches: Vec<usize>,
    rings: BTreeMap<u32, (usize, Option<BondExpr>)>,
    // Position of the first element primitive inside the current bracket.
    atom_start: usize,
}

impl<'a> SmartsParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            adjacency: Vec::new(),
            previous: None,
            pending_bond: None,
            branches: Vec::new(),
            rings: BTreeMap::new(),
            atom_start: usize::MAX,
        }
    }

    fn error(&self, reason: impl Into<String>) -> ChemError {
        ChemError::Smarts {
            input: self.input.to_string(),
            position: self.pos,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn rest(&self) -> &'a str {
        let input = self.input;
        &input[self.pos..]
    }

    fn parse(mut self) -> Result<SmartsPattern> {
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
                b'-' | b'=' | b'#' | b'$' | b':' | b'~' | b'@' | b'/' | b'\\' | b'!' => {
                    if self.previous.is_none() {
                        return Err(self.error("bond without preceding atom"));
                    }
                    if self.pending_bond.is_some() {
                        return Err(self.error("two consecutive bonds"));
                    }
                    let expr = self.bond_expr()?;
                    self.pending_bond = Some(expr);
                }
                b'0'..=b'9' | b'%' => self.ring_closure()?,
                b'[' => {
                    self.pos += 1;
                    self.atom_start = self.pos;
                    let expr = self.low_and_expr()?;
                    if self.peek() != Some(b']') {
                        return Err(self.error("expected ']'"));
                    }
                    self.pos += 1;
                    self.push_atom(expr);
                }
                _ => {
                    let expr = self.bare_atom()?;
                    self.push_atom(expr);
                }
            }
        }

        if self.pending_bond.is_some() {
            return Err(self.error("bond at end of pattern"));
        }
        if !self.branches.is_empty() {
            return Err(self.error("unclosed branch"));
        }
        if let Some(number) = self.rings.keys().next() {
            return Err(self.error(format!("unclosed ring bond {number}")));
        }

        Ok(SmartsPattern {
            source: self.input.to_string(),
            atoms: self.atoms,
            bonds: self.bonds,
            adjacency: self.adjacency,
        })
    }

    fn push_atom(&mut self, expr: AtomExpr) {
        self.atoms.push(expr);
        self.adjacency.push(Vec::new());
        let index = self.atoms.len() - 1;
        if let Some(previous) = self.previous {
            let bond = self.pending_bond.take();
            self.add_bond(previous, index, bond);
        }
        self.previous = Some(index);
    }

    fn add_bond(&mut self, begin: usize, end: usize, expr: Option<BondExpr>) {
        let index = self.bonds.len();
        self.bonds.push(QueryBond { begin, end, expr });
        self.adjacency[begin].push(index);
        self.adjacency[end].push(index);
    }

    fn ring_closure(&mut self) -> Result<()> {
        let Some(atom) = self.previous else {
            return Err(self.error("ring bond without preceding atom"));
        };

        let number = if self.peek() == Some(b'%') {
            self.pos += 1;
            let digits = self.take_digits();
            if digits.len() != 2 {
                return Err(self.error("'%' must be followed by two digits"));
            }
            digits
                .parse()
                .map_err(|_| self.error("invalid ring number"))?
        } else {
            let digit = self.peek().map_or(0, |c| u32::from(c - b'0'));
            self.pos += 1;
            digit
        };
        let bond = self.pending_bond.take();

        match self.rings.remove(&number) {
            Some((opening, opening_bond)) => {
                if opening == atom {
                    return Err(self.error(format!("ring {number} closes on its own atom")));
                }
                let expr = match (opening_bond, bond) {
                    (Some(a), Some(b)) if a == b => Some(a),
                    (Some(a), Some(b)) => Some(BondExpr::And(vec![a, b])),
                    (a, b) => a.or(b),
                };
                self.add_bond(opening, atom, expr);
            }
            None => {
                self.rings.insert(number, (atom, bond));
            }
        }
        Ok(())
    }

    fn take_digits(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let input = self.input;
        &input[start..self.pos]
    }

    fn optional_count(&mut self, default: usize) -> Result<usize> {
        match self.take_digits() {
            "" => Ok(default),
            digits => digits.parse().map_err(|_| self.error("count out of range")),
        }
    }

    fn bare_atom(&mut self) -> Result<AtomExpr> {
        let rest = self.rest();

        for symbol in ["Cl", "Br"] {
            if rest.starts_with(symbol) {
                self.pos += 2;
                return Ok(AtomExpr::Primitive(AtomPrimitive::Element {
                    atomic_number: element::atomic_number(symbol).unwrap_or(0),
                    aromatic: Some(false),
                }));
            }
        }

        let c = self.peek().unwrap_or(b' ');
        let primitive = match c {
            b'*' => Some(AtomPrimitive::Any),
            b'a' => Some(AtomPrimitive::Aromatic),
            b'A' => Some(AtomPrimitive::Aliphatic),
            _ => {
                let symbol = char::from(c).to_string();
                if c.is_ascii_uppercase() {
                    element::atomic_number(&symbol)
                        .filter(|&n| element::is_organic_subset(n))
                        .map(|atomic_number| AtomPrimitive::Element {
                            atomic_number,
                            aromatic: Some(false),
                        })
                } else {
                    element::aromatic_atomic_number(&symbol)
                        .filter(|&n| element::is_organic_subset(n))
                        .map(|atomic_number| AtomPrimitive::Element {
                            atomic_number,
                            aromatic: Some(true),
                        })
                }
            }
        };

        match primitive {
            Some(primitive) => {
                self.pos += 1;
                Ok(AtomExpr::Primitive(primitive))
            }
            None => Err(self.error(format!("unexpected character '{}'", char::from(c)))),
        }
    }

    // Atom expression grammar, loosest binding first:
    //   low  := or  (';' or)*
    //   or   := high (',' high)*
    //   high := unary ('&'? unary)*
    //   unary := '!' unary | primitive

    fn low_and_expr(&mut self) -> Result<AtomExpr> {
        let mut terms = vec![self.or_expr()?];
        while self.peek() == Some(b';') {
            self.pos += 1;
            terms.push(self.or_expr()?);
        }
        Ok(collapse(terms, AtomExpr::And))
    }

    fn or_expr(&mut self) -> Result<AtomExpr> {
        let mut terms = vec![self.high_and_expr()?];
        while self.peek() == Some(b',') {
            self.pos += 1;
            terms.push(self.high_and_expr()?);
        }
        Ok(collapse(terms, AtomExpr::Or))
    }

    fn high_and_expr(&mut self) -> Result<AtomExpr> {
        let mut terms = vec![self.unary_expr()?];
        loop {
            match self.peek() {
                Some(b'&') => {
                    self.pos += 1;
                    terms.push(self.unary_expr()?);
                }
                Some(b';' | b',' | b']') | None => break,
                Some(_) => terms.push(self.unary_expr()?),
            }
        }
        Ok(collapse(terms, AtomExpr::And))
    }

    fn unary_expr(&mut self) -> Result<AtomExpr> {
        if self.peek() == Some(b'!') {
            self.pos += 1;
            return Ok(AtomExpr::Not(Box::new(self.unary_expr()?)));
        }
        Ok(AtomExpr::Primitive(self.atom_primitive()?))
    }

    #[allow(clippy::too_many_lines)]
    fn atom_primitive(&mut self) -> Result<AtomPrimitive> {
        let Some(c) = self.peek() else {
            return Err(self.error("unexpected end of atom expression"));
        };

        if c.is_ascii_digit() {
            let at_start = self.pos == self.atom_start;
            let digits = self.take_digits();
            if at_start {
                self.atom_start = self.pos;
            }
            let isotope = digits
                .parse()
                .map_err(|_| self.error("isotope out of range"))?;
            return Ok(AtomPrimitive::Isotope(isotope));
        }

        let rest = self.rest();

        // A leading `H` without a count is the hydrogen element (`[H+]`, `[2H]`).
        if c == b'H'
            && self.pos == self.atom_start
            && !rest.as_bytes().get(1).is_some_and(u8::is_ascii_digit)
            && rest.get(..2).and_then(element::atomic_number).is_none()
        {
            self.pos += 1;
            return Ok(AtomPrimitive::Element {
                atomic_number: 1,
                aromatic: Some(false),
            });
        }

        // Two-letter element symbols win over single-letter primitives.
        if let Some(candidate) = rest.get(..2) {
            if let Some(number) = element::aromatic_atomic_number(candidate) {
                self.pos += 2;
                return Ok(AtomPrimitive::Element {
                    atomic_number: number,
                    aromatic: Some(true),
                });
            }
            if c.is_ascii_uppercase() {
                if let Some(number) = element::atomic_number(candidate) {
                    self.pos += 2;
                    return Ok(AtomPrimitive::Element {
                        atomic_number: number,
                        aromatic: Some(false),
                    });
                }
            }
        }

        self.pos += 1;
        let primitive = match c {
            b'*' => AtomPrimitive::Any,
            b'a' => AtomPrimitive::Aromatic,
            b'A' => AtomPrimitive::Aliphatic,
            b'#' => {
                let digits = self.take_digits();
                if digits.is_empty() {
                    return Err(self.error("'#' must be followed by an atomic number"));
                }
                AtomPrimitive::AtomicNumber(
                    digits
                        .parse()
                        .map_err(|_| self.error("atomic number out of range"))?,
                )
            }
            b'D' => AtomPrimitive::Degree(self.optional_count(1)?),
            b'H' => AtomPrimitive::TotalHydrogens(self.optional_count(1)?),
            b'X' => AtomPrimitive::Connectivity(self.optional_count(1)?),
            b'v' => AtomPrimitive::Valence(self.optional_count(1)?),
            b'x' => AtomPrimitive::RingBonds(self.optional_count(1)?),
            b'R' => match self.take_digits() {
                "" => AtomPrimitive::Rings(None),
                digits => AtomPrimitive::Rings(Some(
                    digits
                        .parse()
                        .map_err(|_| self.error("ring count out of range"))?,
                )),
            },
            b'+' | b'-' => {
                let sign: i8 = if c == b'+' { 1 } else { -1 };
                let digits = self.take_digits();
                let magnitude: i8 = if digits.is_empty() {
                    let mut magnitude: i8 = 1;
                    while self.peek() == Some(c) {
                        self.pos += 1;
                        magnitude = magnitude.saturating_add(1);
                    }
                    magnitude
                } else {
                    digits
                        .parse()
                        .map_err(|_| self.error("charge out of range"))?
                };
                AtomPrimitive::Charge(sign * magnitude)
            }
            b'@' => {
                while matches!(self.peek(), Some(b'@' | b'?')) {
                    self.pos += 1;
                }
                AtomPrimitive::Any
            }
            b'$' => return Err(self.error("recursive SMARTS is not supported")),
            b'r' => return Err(self.error("ring size primitive 'r' is not supported")),
            b'h' => return Err(self.error("implicit hydrogen primitive 'h' is not supported")),
            _ => {
                let symbol = char::from(c).to_string();
                if c.is_ascii_uppercase() {
                    let number = element::atomic_number(&symbol)
                        .ok_or_else(|| self.error(format!("unknown element '{symbol}'")))?;
                    AtomPrimitive::Element {
                        atomic_number: number,
                        aromatic: Some(false),
                    }
                } else {
                    let number = element::aromatic_atomic_number(&symbol).ok_or_else(|| {
                        self.error(format!("unexpected character '{symbol}' in atom expression"))
                    })?;
                    AtomPrimitive::Element {
                        atomic_number: number,
                        aromatic: Some(true),
                    }
                }
            }
        };
        Ok(primitive)
    }

    // Bond expressions use the same operators as atom expressions.

    fn bond_expr(&mut self) -> Result<BondExpr> {
        let mut terms = vec![self.bond_or_expr()?];
        while self.peek() == Some(b';') {
            self.pos += 1;
            terms.push(self.bond_or_expr()?);
        }
        Ok(collapse(terms, BondExpr::And))
    }

    fn bond_or_expr(&mut self) -> Result<BondExpr> {
        let mut terms = vec![self.bond_and_expr()?];
        while self.peek() == Some(b',') {
            self.pos += 1;
            terms.push(self.bond_and_expr()?);
        }
        Ok(collapse(terms, BondExpr::Or))
    }

    fn bond_and_expr(&mut self) -> Result<BondExpr> {
        let mut terms = vec![self.bond_unary()?];
        loop {
            match self.peek() {
                Some(b'&') => {
                    self.pos += 1;
                    terms.push(self.bond_unary()?);
                }
                Some(c) if bond_primitive(c).is_some() || c == b'!' => {
                    terms.push(self.bond_unary()?);
                }
                _ => break,
            }
        }
        Ok(collapse(terms, BondExpr::And))
    }

    fn bond_unary(&mut self) -> Result<BondExpr> {
        match self.peek() {
            Some(b'!') => {
                self.pos += 1;
                Ok(BondExpr::Not(Box::new(self.bond_unary()?)))
            }
            Some(c) => match bond_primitive(c) {
                Some(primitive) => {
                    self.pos += 1;
                    Ok(BondExpr::Primitive(primitive))
                }
                None => Err(self.error("expected bond")),
            },
            None => Err(self.error("unexpected end of bond expression")),
        }
    }
}

fn bond_primitive(c: u8) -> Option<BondPrimitive> {
    match c {
        b'-' | b'/' | b'\\' => Some(BondPrimitive::Single),
        b'=' => Some(BondPrimitive::Double),
        b'#' => Some(BondPrimitive::Triple),
        b'$' => Some(BondPrimitive::Quadruple),
        b':' => Some(BondPrimitive::Aromatic),
        b'~' => Some(BondPrimitive::Any),
        b'@' => Some(BondPrimitive::Ring),
        _ => None,
    }
}

fn collapse<T>(mut terms: Vec<T>, combine: fn(Vec<T>) -> T) -> T {
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        combine(terms)
    }
}

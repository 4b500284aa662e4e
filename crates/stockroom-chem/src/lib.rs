//! Stockroom Chem - Structure handling for availability lookups.
//!
//! A small, dependency-free reader for the parts of SMILES and SMARTS that
//! stock lists and cofactor patterns use, plus the standardizers applied to
//! every identifier before it is compared against a source.
//!
//! # Example
//!
//! ```rust
//! use stockroom_chem::{parse_smiles, SmartsPattern, Standardizer, FragmentStandardizer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ethanol = parse_smiles("CCO")?;
//! let hydroxyl = SmartsPattern::parse("[O;H1]")?;
//! assert!(hydroxyl.matches(&ethanol));
//!
//! let salt = FragmentStandardizer.standardize("[Na+].CC(=O)[O-]")?;
//! assert_eq!(salt, "CC(=O)[O-].[Na+]");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod element;
pub mod error;
pub mod molecule;
pub mod smarts;
pub mod smiles;
pub mod standardize;
mod substructure;

pub use error::{ChemError, Result};
pub use molecule::{Atom, Bond, BondOrder, Molecule};
pub use smarts::{AtomExpr, AtomPrimitive, BondExpr, BondPrimitive, QueryBond, SmartsPattern};
pub use smiles::{is_valid_smiles, parse_smiles};
pub use standardize::{default_standardizer, FragmentStandardizer, Standardizer, TildeSubstitution};

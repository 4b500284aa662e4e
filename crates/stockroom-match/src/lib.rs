//! Stockroom Match - Availability matchers and their combinator.
//!
//! Every availability source implements [`SmilesAvailability`]: given a
//! SMILES string it yields a lazy sequence of [`AvailabilityMatch`] records.
//! Four source kinds are provided:
//!
//! - [`AvailabilityFromSmiles`] - membership in a fixed set of SMILES
//! - [`AvailabilityFromRegex`] - regular expressions over the SMILES text
//! - [`AvailabilityFromSmarts`] - SMARTS substructure patterns
//! - [`AvailabilityFromDatabase`] - delegation to an [`AvailabilityOracle`]
//!
//! [`AvailabilityCombiner`] puts several sources behind a list of
//! exclusions and is itself a source.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stockroom_match::{
//!     AvailabilityCombiner, AvailabilityFromSmarts, AvailabilityFromSmiles, Exclusion,
//!     SmilesAvailability, Source,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let combiner = AvailabilityCombiner::new(vec![
//!     Source::new("stock", Arc::new(AvailabilityFromSmiles::new(["CCO"]))),
//!     Source::new("halides", Arc::new(AvailabilityFromSmarts::new(["[Cl,Br]"])?)),
//! ])
//! .with_exclusions(vec![Exclusion::predicate(|smiles| smiles == "CCl")]);
//!
//! assert!(combiner.is_available("CCO")?);
//! assert!(combiner.is_available("CCBr")?);
//! assert!(!combiner.is_available("CCl")?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod availability;
pub mod combiner;
pub mod error;
pub mod from_database;
pub mod from_regex;
pub mod from_smarts;
pub mod from_smiles;
pub mod oracle;
pub mod record;

pub use availability::{no_matches, standardize_or_warn, MatchIter, SmilesAvailability};
pub use combiner::{AvailabilityCombiner, Exclusion, Source, SourcedMatch};
pub use error::{MatchError, OracleError, Result};
pub use from_database::AvailabilityFromDatabase;
pub use from_regex::AvailabilityFromRegex;
pub use from_smarts::AvailabilityFromSmarts;
pub use from_smiles::AvailabilityFromSmiles;
pub use oracle::AvailabilityOracle;
pub use record::AvailabilityMatch;

//! Stockroom Availability - Is this molecule a usable starting material?
//!
//! [`IsAvailable`] combines the packaged default lists (common reagents,
//! biochemical byproducts, ion/element regexes, cofactor SMARTS), the
//! user's always-available, model-specific and excluded compounds, and the
//! configured catalog databases into one priority-ordered decision.
//!
//! # Example
//!
//! ```rust
//! use stockroom_availability::IsAvailable;
//! use stockroom_core::{AvailabilityConfig, Category};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AvailabilityConfig {
//!     always_available: vec!["CC(C)Cc1ccc(C(C)C(=O)O)cc1".to_string()],
//!     ..AvailabilityConfig::default()
//! };
//! let is_available = IsAvailable::new(&config, Vec::new())?;
//!
//! assert!(is_available.is_available("B1C2CCCC1CCC2")?);
//! assert!(is_available.is_available("CC(C)Cc1ccc(C(C)C(=O)O)cc1")?);
//! assert_eq!(is_available.availability_category("C1CCCCCCCC1")?, Category::Unavailable);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod defaults;
pub mod error;
pub mod is_available;

// Re-export commonly used types
pub use defaults::{get_compounds_from_file, parse_compound_list};
pub use error::{AvailabilityError, Result};
pub use is_available::{IsAvailable, SOURCE_INFO_KEY};

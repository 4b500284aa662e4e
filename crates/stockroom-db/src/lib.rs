//! Stockroom DB - Catalog databases for commercial availability.
//!
//! Each catalog is an `SQLite` table of supplier offers (`smiles`,
//! `price_per_amount`). [`CatalogDatabase`] implements
//! [`stockroom_match::AvailabilityOracle`], so a catalog can back an
//! `AvailabilityFromDatabase` source directly.
//!
//! # Example
//!
//! ```rust
//! use stockroom_core::PricingThreshold;
//! use stockroom_db::{CatalogDatabase, Price};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = CatalogDatabase::in_memory()?;
//! catalog.insert("CCO", &Price::from(4.5))?;
//!
//! assert!(catalog.check_availability("CCO", PricingThreshold::new(10))?);
//! assert!(!catalog.check_availability("CCO", PricingThreshold::new(4))?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod pricing;

// Re-export commonly used types
pub use catalog::{CatalogDatabase, CACHE_CAPACITY, DEFAULT_TABLE};
pub use config::{initialize_databases, load_database_config, DatabaseEntry};
pub use error::{DatabaseError, Result};
pub use pricing::{availability_from_prices, Price};

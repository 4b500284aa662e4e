//! Stockroom Core - Foundation crate for the Stockroom availability engine.
//!
//! This crate provides shared types, error handling, configuration management
//! and logging setup that all other Stockroom crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared newtypes and enums (`PricingThreshold`, `DatabaseId`, `Category`)
//! - [`logging`] - `tracing-subscriber` initialization
//!
//! # Logging
//!
//! Library crates only emit `tracing` events. Applications install the
//! subscriber once at startup with the configured filter; `RUST_LOG`
//! overrides it:
//!
//! ```rust,no_run
//! use stockroom_core::{init_tracing, AppConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load_with_env()?;
//! init_tracing(&config.general.log_filter);
//! # Ok(())
//! # }
//! ```
//!
//! # Example
//!
//! ```rust
//! use stockroom_core::{AppConfig, Category};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert!(config.availability.pricing_threshold.is_unlimited());
//!
//! let metadata = Category::Common.metadata();
//! println!("{} ({})", metadata.label, metadata.color);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, AvailabilityConfig, DatabasesConfig, GeneralConfig};
pub use error::{ConfigError, ConfigResult, Result, StockroomError};
pub use logging::init_tracing;
pub use types::{Category, CategoryMetadata, DatabaseId, PricingThreshold, AVAILABILITY_METADATA};

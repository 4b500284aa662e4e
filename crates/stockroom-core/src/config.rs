//! Configuration management for Stockroom.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::PricingThreshold;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at the database configuration file.
pub const ENV_DATABASE_CONFIG_PATH: &str = "STOCKROOM_DATABASE_CONFIG_PATH";
/// Environment variable overriding the pricing threshold.
pub const ENV_PRICING_THRESHOLD: &str = "STOCKROOM_PRICING_THRESHOLD";
/// Environment variable overriding the exclusive-materials flag.
pub const ENV_MATERIALS_EXCLUSIVE: &str = "STOCKROOM_MATERIALS_EXCLUSIVE";

/// Main application configuration.
///
/// This is loaded from `~/.config/stockroom/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Availability sources and query behavior
    pub availability: AvailabilityConfig,
    /// Catalog databases
    pub databases: DatabasesConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `STOCKROOM_DATABASE_CONFIG_PATH`: path to the database configuration file
    /// - `STOCKROOM_PRICING_THRESHOLD`: pricing threshold in USD per g/L
    /// - `STOCKROOM_MATERIALS_EXCLUSIVE`: whether user materials replace the other
    ///   sources (true/false)
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// [`AppConfig::load_with_env`]). Unparsable values are rejected.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_DATABASE_CONFIG_PATH) {
            tracing::debug!("Override databases.config_path from env: {}", val);
            self.databases.config_path = Some(PathBuf::from(val));
        }

        if let Some(val) = lookup(ENV_PRICING_THRESHOLD) {
            let threshold = val
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: ENV_PRICING_THRESHOLD.to_string(),
                    reason: e.to_string(),
                })?;
            self.availability.pricing_threshold = PricingThreshold::new(threshold);
            tracing::debug!("Override availability.pricing_threshold from env: {}", threshold);
        }

        if let Some(val) = lookup(ENV_MATERIALS_EXCLUSIVE) {
            let exclusive = val
                .trim()
                .parse::<bool>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: ENV_MATERIALS_EXCLUSIVE.to_string(),
                    reason: e.to_string(),
                })?;
            self.availability.are_materials_exclusive = exclusive;
            tracing::debug!(
                "Override availability.are_materials_exclusive from env: {}",
                exclusive
            );
        }

        Ok(())
    }

    /// Save configuration to the default location.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit file.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/stockroom/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("org", "stockroom", "stockroom").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default `tracing` filter directive, used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_filter: crate::logging::DEFAULT_FILTER.to_string(),
        }
    }
}

/// Availability sources and query behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    /// Maximum price in USD per g/L for database sources (0 = no limit)
    pub pricing_threshold: PricingThreshold,
    /// Whether user-provided materials replace (true) or complement (false)
    /// the model-specific compounds and the databases
    pub are_materials_exclusive: bool,
    /// Compounds that are always available
    pub always_available: Vec<String>,
    /// Compounds available for the selected model
    pub model_available: Vec<String>,
    /// Compounds that are never available
    pub excluded: Vec<String>,
    /// SMARTS patterns of substructures to avoid
    pub avoid_substructures: Vec<String>,
    /// File with additional default compounds, one SMILES per line
    pub additional_compounds_path: Option<PathBuf>,
}

/// Catalog database settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabasesConfig {
    /// JSON file describing the catalog databases (none = no database sources)
    pub config_path: Option<PathBuf>,
}

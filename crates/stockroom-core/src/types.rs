//! Shared types used across Stockroom.
//!
//! This module defines common newtypes and enums that provide type safety
//! and clear domain modeling.

use crate::error::StockroomError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Maximum price (USD per g/L) a database compound may have to count as available.
///
/// `0` and [`PricingThreshold::NO_LIMIT_SENTINEL`] both disable price filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricingThreshold(u32);

impl PricingThreshold {
    /// Threshold value that front ends use for "maximum", meaning no limit.
    pub const NO_LIMIT_SENTINEL: u32 = 1000;

    /// No price filtering.
    pub const UNLIMITED: Self = Self(0);

    /// Create a threshold from a raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether this threshold disables price filtering.
    #[must_use]
    pub const fn is_unlimited(self) -> bool {
        self.0 == 0 || self.0 == Self::NO_LIMIT_SENTINEL
    }

    /// Whether a price is strictly below the threshold.
    ///
    /// Always true for unlimited thresholds.
    #[must_use]
    pub fn admits(self, price: f64) -> bool {
        self.is_unlimited() || price < f64::from(self.0)
    }
}

impl From<u32> for PricingThreshold {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for PricingThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for catalog database names with validation.
///
/// Database names are 1-64 characters: letters, digits, hyphens, underscores
/// and dots, starting with a letter or digit (`emolecules`, `ZINC`, `Enamine_2024`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatabaseId(String);

impl DatabaseId {
    /// Create a new `DatabaseId` from a string.
    ///
    /// # Errors
    /// Returns error if the name doesn't match the required format.
    pub fn new(id: impl Into<String>) -> Result<Self, StockroomError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<(), StockroomError> {
        static DATABASE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = DATABASE_REGEX
            .get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{0,63}$").expect("valid regex"));

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(StockroomError::Validation(format!(
                "invalid database name: must be 1-64 letters, digits, hyphens, \
                 underscores or dots, got '{id}'"
            )))
        }
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a compound is (or is not) available.
///
/// Each availability source registered with the orchestrator is tagged with
/// one of these categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Common molecule available by default, or provided by the user
    Common,
    /// Model-specific compound
    Model,
    /// Found in the eMolecules catalog
    Emolecules,
    /// Found in any other catalog database
    Database,
    /// No source matched
    Unavailable,
    /// Molecule from file
    FromFile,
}

impl Category {
    /// Name of the one database that gets its own category.
    pub const EMOLECULES_DATABASE: &'static str = "emolecules";

    /// Category for a catalog database.
    ///
    /// Only the eMolecules database is distinguished; every other database
    /// shares [`Category::Database`].
    #[must_use]
    pub fn for_database(id: &DatabaseId) -> Self {
        if id.as_str() == Self::EMOLECULES_DATABASE {
            Self::Emolecules
        } else {
            Self::Database
        }
    }

    /// Key of this category in the metadata table.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Model => "model",
            Self::Emolecules => "emolecules",
            Self::Database => "database",
            Self::Unavailable => "unavailable",
            Self::FromFile => "from_file",
        }
    }

    /// Display metadata for this category.
    #[must_use]
    pub fn metadata(self) -> &'static CategoryMetadata {
        let index = match self {
            Self::Common => 0,
            Self::Model => 1,
            Self::Emolecules => 2,
            Self::Database => 3,
            Self::Unavailable => 4,
            Self::FromFile => 5,
        };
        &AVAILABILITY_METADATA[index].1
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation metadata attached to a [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryMetadata {
    /// Hex color code
    pub color: &'static str,
    /// Human-readable label
    pub label: &'static str,
}

/// Ordered category table exposed to presentation layers.
pub static AVAILABILITY_METADATA: [(Category, CategoryMetadata); 6] = [
    (
        Category::Common,
        CategoryMetadata {
            color: "#002d9c",
            label: "Common molecule available by default",
        },
    ),
    (
        Category::Model,
        CategoryMetadata {
            color: "#0f62fe",
            label: "Molecule available using a model-specific database",
        },
    ),
    (
        Category::Emolecules,
        CategoryMetadata {
            color: "#28a30d",
            label: "Molecule commercially available on eMolecules.com",
        },
    ),
    (
        Category::Database,
        CategoryMetadata {
            color: "#3ddbd9",
            label: "Molecule commercially available from a database",
        },
    ),
    (
        Category::Unavailable,
        CategoryMetadata {
            color: "#ce4e04",
            label: "Not able to find a synthetic path",
        },
    ),
    (
        Category::FromFile,
        CategoryMetadata {
            color: "#f1c21b",
            label: "Molecule from file",
        },
    ),
];

//! Price filtering for catalog entries.

use rusqlite::types::{FromSql, FromSqlResult, Null, ToSql, ToSqlOutput, ValueRef};
use stockroom_core::PricingThreshold;

/// The `price_per_amount` of one catalog entry.
///
/// Catalogs mix numbers with placeholders such as `"NA"`; only numeric
/// prices take part in threshold comparisons.
#[derive(Debug, Clone, PartialEq)]
pub enum Price {
    /// Price in USD per g/L
    Numeric(f64),
    /// Non-numeric placeholder
    Other(String),
    /// No price recorded
    Missing,
}

impl Price {
    /// Numeric value, if any.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Numeric(value) => Some(*value),
            Self::Other(_) | Self::Missing => None,
        }
    }
}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for Price {
    fn from(value: &str) -> Self {
        Self::Other(value.to_string())
    }
}

impl FromSql for Price {
    #[allow(clippy::cast_precision_loss)]
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Integer(value) => Self::Numeric(value as f64),
            ValueRef::Real(value) => Self::Numeric(value),
            ValueRef::Text(_) => Self::Other(value.as_str()?.to_string()),
            ValueRef::Null | ValueRef::Blob(_) => Self::Missing,
        })
    }
}

impl ToSql for Price {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Numeric(value) => ToSqlOutput::from(*value),
            Self::Other(text) => ToSqlOutput::from(text.as_str()),
            Self::Missing => ToSqlOutput::from(Null),
        })
    }
}

/// Decide availability from the prices of all catalog entries for a compound.
///
/// - no entries: unavailable
/// - unlimited threshold: available
/// - otherwise available iff the cheapest numeric price is strictly below
///   the threshold (no numeric price: unavailable)
#[must_use]
pub fn availability_from_prices(prices: &[Price], threshold: PricingThreshold) -> bool {
    if prices.is_empty() {
        return false;
    }
    if threshold.is_unlimited() {
        return true;
    }
    prices
        .iter()
        .filter_map(Price::as_f64)
        .min_by(f64::total_cmp)
        .is_some_and(|cheapest| threshold.admits(cheapest))
}

//! Database configuration files.
//!
//! A JSON object mapping each database name to its location:
//!
//! ```json
//! {
//!     "emolecules": { "path": "emolecules.sqlite" },
//!     "in_house": { "path": "/data/stock.sqlite", "table": "offers" }
//! }
//! ```
//!
//! Entries keep their file order, which is the order in which the databases
//! are queried. Relative paths are resolved against the configuration
//! file's directory, and the files they name must exist.

use crate::catalog::{CatalogDatabase, DEFAULT_TABLE};
use crate::error::{DatabaseError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stockroom_core::DatabaseId;
use tracing::{info, warn};

/// Location of one catalog database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseEntry {
    /// `SQLite` file
    pub path: PathBuf,

    /// Catalog table, [`DEFAULT_TABLE`] if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl DatabaseEntry {
    /// Table to query.
    #[must_use]
    pub fn table(&self) -> &str {
        self.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }
}

/// Read a database configuration file, keeping entry order.
pub fn load_database_config(path: &Path) -> Result<Vec<(DatabaseId, DatabaseEntry)>> {
    let config_error = |reason: String| DatabaseError::Config {
        path: path.to_path_buf(),
        reason,
    };

    let contents = std::fs::read_to_string(path)?;
    let entries: Map<String, Value> =
        serde_json::from_str(&contents).map_err(|err| config_error(err.to_string()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));

    entries
        .into_iter()
        .map(|(name, value)| {
            let id = DatabaseId::new(name.as_str())
                .map_err(|err| config_error(format!("database \"{name}\": {err}")))?;
            let mut entry: DatabaseEntry = serde_json::from_value(value)
                .map_err(|err| config_error(format!("database \"{name}\": {err}")))?;
            if entry.path.is_relative() {
                entry.path = base.join(&entry.path);
            }
            Ok((id, entry))
        })
        .collect()
}

/// Open every database named in the configuration file at `config_path`.
///
/// Without a configuration file no databases are used. Catalog files must
/// already exist; a missing one is a configuration error.
pub fn initialize_databases(
    config_path: Option<&Path>,
) -> Result<Vec<(DatabaseId, Arc<CatalogDatabase>)>> {
    let Some(config_path) = config_path else {
        warn!("No database configuration provided, not using database sources");
        return Ok(Vec::new());
    };

    let databases = load_database_config(config_path)?
        .into_iter()
        .map(|(id, entry)| {
            let database = CatalogDatabase::open_existing(&entry.path, entry.table()).map_err(
                |err| match err {
                    DatabaseError::MissingCatalog(missing) => DatabaseError::Config {
                        path: config_path.to_path_buf(),
                        reason: format!(
                            "database \"{id}\": catalog file {} does not exist",
                            missing.display()
                        ),
                    },
                    other => other,
                },
            )?;
            Ok((id, Arc::new(database)))
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        count = databases.len(),
        config = %config_path.display(),
        "Initialized catalog databases"
    );
    Ok(databases)
}

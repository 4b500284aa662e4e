//! `SQLite`-backed compound catalogs.
//!
//! A catalog is a table with a `smiles` column and a `price_per_amount`
//! column (USD per g/L; numbers, text placeholders such as `"NA"`, or NULL).
//! Several entries may exist per compound, one per supplier offer.

use crate::error::{DatabaseError, Result};
use crate::pricing::{availability_from_prices, Price};
use moka::sync::Cache;
use regex::Regex;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use stockroom_core::PricingThreshold;
use stockroom_match::{AvailabilityOracle, OracleError};
use tracing::{debug, info};

/// Table used when the configuration names none.
pub const DEFAULT_TABLE: &str = "availability";

/// Number of per-compound price lists kept in memory.
pub const CACHE_CAPACITY: u64 = 512;

fn table_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").expect("valid regex"))
}

/// A compound catalog stored in an `SQLite` database.
pub struct CatalogDatabase {
    connection: Mutex<Connection>,
    table: String,
    cache: Cache<String, Arc<Vec<Price>>>,
}

impl CatalogDatabase {
    /// Open (or create) the catalog at `path` using the default table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_table(path, DEFAULT_TABLE)
    }

    /// Open (or create) the catalog at `path` using `table`.
    ///
    /// The table and its `smiles` index are created if missing.
    pub fn open_with_table(path: impl AsRef<Path>, table: &str) -> Result<Self> {
        let path = path.as_ref();
        validate_table_name(table)?;
        let connection = Connection::open(path)?;
        let catalog = Self::from_connection(connection, table)?;
        info!(path = %path.display(), table = %table, "Opened catalog database");
        Ok(catalog)
    }

    /// Open the existing catalog at `path` using `table`, without creating the file.
    ///
    /// Used for catalogs named in a database configuration file, where a
    /// missing file is a configuration mistake.
    pub fn open_existing(path: impl AsRef<Path>, table: &str) -> Result<Self> {
        let path = path.as_ref();
        validate_table_name(table)?;
        if !path.is_file() {
            return Err(DatabaseError::MissingCatalog(path.to_path_buf()));
        }
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let catalog = Self::from_connection(connection, table)?;
        info!(path = %path.display(), table = %table, "Opened catalog database");
        Ok(catalog)
    }

    /// Create an empty in-memory catalog.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, DEFAULT_TABLE)
    }

    fn from_connection(connection: Connection, table: &str) -> Result<Self> {
        validate_table_name(table)?;
        connection.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                 smiles TEXT NOT NULL,
                 price_per_amount
             );
             CREATE INDEX IF NOT EXISTS idx_{table}_smiles ON {table} (smiles);"
        ))?;

        Ok(Self {
            connection: Mutex::new(connection),
            table: table.to_string(),
            cache: Cache::new(CACHE_CAPACITY),
        })
    }

    /// Name of the catalog table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Add an offer for `smiles`.
    pub fn insert(&self, smiles: &str, price: &Price) -> Result<()> {
        let connection = self.connection.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        connection.execute(
            &format!(
                "INSERT INTO {} (smiles, price_per_amount) VALUES (?1, ?2)",
                self.table
            ),
            params![smiles, price],
        )?;
        self.cache.invalidate(smiles);
        Ok(())
    }

    /// All recorded prices for `smiles`, in insertion order.
    pub fn prices(&self, smiles: &str) -> Result<Arc<Vec<Price>>> {
        if let Some(prices) = self.cache.get(smiles) {
            return Ok(prices);
        }

        debug!(smiles = %smiles, table = %self.table, "Querying catalog");
        let prices = {
            let connection = self.connection.lock().map_err(|_| DatabaseError::LockPoisoned)?;
            let mut statement = connection.prepare_cached(&format!(
                "SELECT price_per_amount FROM {} WHERE smiles = ?1 ORDER BY rowid",
                self.table
            ))?;
            let rows = statement.query_map(params![smiles], |row| row.get::<_, Price>(0))?;
            let prices = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Arc::new(prices)
        };

        self.cache.insert(smiles.to_string(), Arc::clone(&prices));
        Ok(prices)
    }

    /// Whether `smiles` can be bought below `threshold`.
    pub fn check_availability(&self, smiles: &str, threshold: PricingThreshold) -> Result<bool> {
        let prices = self.prices(smiles)?;
        let available = availability_from_prices(&prices, threshold);
        debug!(
            smiles = %smiles,
            threshold = %threshold,
            offers = prices.len(),
            available,
            "Checked catalog availability"
        );
        Ok(available)
    }
}

impl AvailabilityOracle for CatalogDatabase {
    fn availability(
        &self,
        smiles: &str,
        threshold: PricingThreshold,
    ) -> std::result::Result<bool, OracleError> {
        self.check_availability(smiles, threshold)
            .map_err(OracleError::from)
    }
}

impl std::fmt::Debug for CatalogDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogDatabase")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

fn validate_table_name(table: &str) -> Result<()> {
    if table_name_regex().is_match(table) {
        Ok(())
    } else {
        Err(DatabaseError::InvalidTableName(table.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_catalog() {
        let catalog = CatalogDatabase::in_memory().expect("in-memory database");
        assert_eq!(catalog.table(), DEFAULT_TABLE);
        assert!(catalog.prices("CCO").expect("query").is_empty());

        catalog.insert("CCO", &Price::from(4.5)).expect("insert");
        catalog.insert("CCO", &Price::from("NA")).expect("insert");
        catalog.insert("CCO", &Price::Missing).expect("insert");

        let prices = catalog.prices("CCO").expect("query");
        assert_eq!(
            prices.as_slice(),
            &[Price::from(4.5), Price::from("NA"), Price::Missing]
        );
    }

    #[test]
    fn test_insert_invalidates_cached_prices() {
        let catalog = CatalogDatabase::in_memory().expect("in-memory database");
        assert!(!catalog
            .check_availability("CCO", PricingThreshold::UNLIMITED)
            .expect("query"));

        catalog.insert("CCO", &Price::from(4.5)).expect("insert");
        assert!(catalog
            .check_availability("CCO", PricingThreshold::UNLIMITED)
            .expect("query"));
    }

    #[test]
    fn test_open_existing_does_not_create() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("absent.sqlite");
        assert!(matches!(
            CatalogDatabase::open_existing(&path, DEFAULT_TABLE),
            Err(DatabaseError::MissingCatalog(missing)) if missing == path
        ));
        assert!(!path.exists());

        CatalogDatabase::open(&path).expect("create catalog");
        assert!(CatalogDatabase::open_existing(&path, DEFAULT_TABLE).is_ok());
    }

    #[test]
    fn test_invalid_table_names() {
        for table in ["", "1table", "drop table; --", "a b"] {
            assert!(matches!(
                validate_table_name(table),
                Err(DatabaseError::InvalidTableName(_))
            ));
        }
        assert!(validate_table_name("emolecules_2024").is_ok());
    }

    #[test]
    fn test_integer_prices_are_numeric() {
        let catalog = CatalogDatabase::in_memory().expect("in-memory database");
        {
            let connection = catalog.connection.lock().expect("lock");
            connection
                .execute(
                    "INSERT INTO availability (smiles, price_per_amount) VALUES ('CO', 7)",
                    [],
                )
                .expect("insert");
        }
        assert_eq!(
            catalog.prices("CO").expect("query").as_slice(),
            &[Price::Numeric(7.0)]
        );
    }
}

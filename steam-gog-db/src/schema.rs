//! SQLite schema creation and migration.

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Migration error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 1;

/// Create all tables and indexes if they don't exist.
///
/// This is idempotent: safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    if get_schema_version(conn)? < CURRENT_VERSION {
        set_schema_version(conn, CURRENT_VERSION)?;
    }
    Ok(())
}

/// Open or create a database at the given path.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000;")?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        create_schema(&conn)?;
    } else if version != CURRENT_VERSION {
        migrate(&conn, version)?;
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Record a schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Bring an existing database up to `CURRENT_VERSION`.
///
/// Version 1 is the first released schema, so there are no steps yet; a
/// database written by a newer build is refused.
fn migrate(conn: &Connection, from_version: i32) -> Result<(), SchemaError> {
    if from_version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: from_version,
        });
    }
    create_schema(conn)
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Owned Steam library
CREATE TABLE IF NOT EXISTS steam_games (
    steam_app_id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    playtime_forever_min INTEGER NOT NULL DEFAULT 0,
    playtime_2weeks_min INTEGER NOT NULL DEFAULT 0,
    last_updated_utc TEXT NOT NULL
);

-- GOGDB catalog
CREATE TABLE IF NOT EXISTS gogdb_products (
    gog_product_id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    normalized_title TEXT NOT NULL DEFAULT '',
    product_type TEXT,
    slug TEXT
);
CREATE INDEX IF NOT EXISTS idx_gogdb_products_title ON gogdb_products(title);
CREATE INDEX IF NOT EXISTS idx_gogdb_products_normalized ON gogdb_products(normalized_title);

-- Price history, append-only
CREATE TABLE IF NOT EXISTS gogdb_prices (
    gog_product_id INTEGER NOT NULL REFERENCES gogdb_products(gog_product_id),
    country TEXT NOT NULL,
    currency TEXT NOT NULL,
    base_price_minor_units INTEGER NOT NULL,
    discounted_price_minor_units INTEGER NOT NULL,
    observed_at TEXT NOT NULL,
    PRIMARY KEY (gog_product_id, country, currency, observed_at)
);
CREATE INDEX IF NOT EXISTS idx_gogdb_prices_lookup ON gogdb_prices(gog_product_id, country, currency, observed_at);

-- One match result per Steam game
CREATE TABLE IF NOT EXISTS gogdb_games (
    steam_app_id INTEGER PRIMARY KEY REFERENCES steam_games(steam_app_id),
    gog_product_id INTEGER REFERENCES gogdb_products(gog_product_id),
    match_method TEXT NOT NULL CHECK (match_method IN ('exact', 'norm_exact', 'like_unique', 'none')),
    match_score REAL NOT NULL,
    matched_at TEXT NOT NULL,
    CHECK ((match_method = 'none') = (gog_product_id IS NULL))
);
CREATE INDEX IF NOT EXISTS idx_gogdb_games_product ON gogdb_games(gog_product_id);

-- Import tracking
CREATE TABLE IF NOT EXISTS import_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_type TEXT NOT NULL,
    source_name TEXT NOT NULL,
    imported_at TEXT NOT NULL,
    records_created INTEGER DEFAULT 0,
    records_updated INTEGER DEFAULT 0,
    records_unchanged INTEGER DEFAULT 0
);
"#;

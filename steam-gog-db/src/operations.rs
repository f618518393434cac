//! Write operations for all persisted entity types.
//!
//! Every upsert reports whether it created, changed or left the row alone,
//! and an upsert with unchanged values never touches the stored row.

use rusqlite::{Connection, OptionalExtension, params};
use steam_gog_catalog::types::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// What an upsert did to the target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    Unchanged,
}

impl UpsertOutcome {
    fn from_change(existed: bool, changed_rows: usize) -> Self {
        match (existed, changed_rows) {
            (false, _) => Self::Created,
            (true, 0) => Self::Unchanged,
            (true, _) => Self::Updated,
        }
    }
}

// ── Steam Library ───────────────────────────────────────────────────────────

/// Insert or update an owned Steam game, keyed by app id.
///
/// `last_updated_utc` only moves when the title or playtime changed.
pub fn upsert_steam_game(conn: &Connection, game: &SteamGame) -> Result<UpsertOutcome, OperationError> {
    let existed = row_exists(conn, "SELECT 1 FROM steam_games WHERE steam_app_id = ?1", game.steam_app_id)?;
    let changed = conn.execute(
        "INSERT INTO steam_games (steam_app_id, title, playtime_forever_min, playtime_2weeks_min, last_updated_utc)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(steam_app_id) DO UPDATE SET
             title = excluded.title,
             playtime_forever_min = excluded.playtime_forever_min,
             playtime_2weeks_min = excluded.playtime_2weeks_min,
             last_updated_utc = excluded.last_updated_utc
         WHERE steam_games.title IS NOT excluded.title
            OR steam_games.playtime_forever_min IS NOT excluded.playtime_forever_min
            OR steam_games.playtime_2weeks_min IS NOT excluded.playtime_2weeks_min",
        params![
            game.steam_app_id,
            game.title,
            game.playtime_forever_min,
            game.playtime_2weeks_min,
            game.last_updated_utc,
        ],
    )?;
    Ok(UpsertOutcome::from_change(existed, changed))
}

// ── GOGDB Catalog ───────────────────────────────────────────────────────────

/// Insert or update a GOGDB product.
pub fn upsert_gog_product(conn: &Connection, product: &GogProduct) -> Result<UpsertOutcome, OperationError> {
    let existed = row_exists(
        conn,
        "SELECT 1 FROM gogdb_products WHERE gog_product_id = ?1",
        product.gog_product_id,
    )?;
    let changed = conn.execute(
        "INSERT INTO gogdb_products (gog_product_id, title, normalized_title, product_type, slug)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(gog_product_id) DO UPDATE SET
             title = excluded.title,
             normalized_title = excluded.normalized_title,
             product_type = excluded.product_type,
             slug = excluded.slug
         WHERE gogdb_products.title IS NOT excluded.title
            OR gogdb_products.normalized_title IS NOT excluded.normalized_title
            OR gogdb_products.product_type IS NOT excluded.product_type
            OR gogdb_products.slug IS NOT excluded.slug",
        params![
            product.gog_product_id,
            product.title,
            product.normalized_title,
            product.product_type,
            product.slug,
        ],
    )?;
    Ok(UpsertOutcome::from_change(existed, changed))
}

/// Append a price observation. Returns `false` if the same observation
/// (product, country, currency, time) is already stored.
pub fn insert_gog_price(conn: &Connection, price: &GogPrice) -> Result<bool, OperationError> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO gogdb_prices (gog_product_id, country, currency,
             base_price_minor_units, discounted_price_minor_units, observed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            price.gog_product_id,
            price.country,
            price.currency,
            price.base_price_minor_units,
            price.discounted_price_minor_units,
            price.observed_at,
        ],
    )?;
    Ok(inserted > 0)
}

// ── Match Results ───────────────────────────────────────────────────────────

/// Insert or replace the match result for a Steam game.
///
/// Runs as a single statement, so each row is written atomically. When the
/// product, method and score equal the stored row nothing is written,
/// `matched_at` included.
pub fn upsert_match_result(
    conn: &Connection,
    result: &MatchResult,
    matched_at: &str,
) -> Result<UpsertOutcome, OperationError> {
    let existed = row_exists(
        conn,
        "SELECT 1 FROM gogdb_games WHERE steam_app_id = ?1",
        result.steam_app_id,
    )?;
    let changed = conn.execute(
        "INSERT INTO gogdb_games (steam_app_id, gog_product_id, match_method, match_score, matched_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(steam_app_id) DO UPDATE SET
             gog_product_id = excluded.gog_product_id,
             match_method = excluded.match_method,
             match_score = excluded.match_score,
             matched_at = excluded.matched_at
         WHERE gogdb_games.gog_product_id IS NOT excluded.gog_product_id
            OR gogdb_games.match_method IS NOT excluded.match_method
            OR gogdb_games.match_score IS NOT excluded.match_score",
        params![
            result.steam_app_id,
            result.gog_product_id,
            result.match_method.as_str(),
            result.match_score,
            matched_at,
        ],
    )?;
    Ok(UpsertOutcome::from_change(existed, changed))
}

// ── Import Log ──────────────────────────────────────────────────────────────

/// Record an import or match run.
pub fn insert_import_log(conn: &Connection, log: &ImportLog) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO import_log (source_type, source_name, imported_at,
             records_created, records_updated, records_unchanged)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            log.source_type,
            log.source_name,
            log.imported_at,
            log.records_created,
            log.records_updated,
            log.records_unchanged,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn row_exists(conn: &Connection, sql: &str, id: i64) -> Result<bool, OperationError> {
    let found: Option<i64> = conn.query_row(sql, [id], |row| row.get(0)).optional()?;
    Ok(found.is_some())
}

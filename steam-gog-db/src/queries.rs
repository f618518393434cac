//! Read queries: matching inputs, stored results, prices and reports.

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};
use steam_gog_catalog::types::*;

use crate::operations::OperationError;

// ── Matching Inputs ─────────────────────────────────────────────────────────

/// Load the Steam library, most played first.
///
/// Ties are broken by app id so that `limit` always selects the same games.
pub fn load_steam_games(
    conn: &Connection,
    limit: Option<usize>,
) -> Result<Vec<SteamGame>, OperationError> {
    let limit = limit.map_or(-1, |n| n as i64);
    let mut stmt = conn.prepare(
        "SELECT steam_app_id, title, playtime_forever_min, playtime_2weeks_min, last_updated_utc
         FROM steam_games
         ORDER BY playtime_forever_min DESC, steam_app_id ASC
         LIMIT ?1",
    )?;
    let rows = stmt.query_map([limit], row_to_steam_game)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Load every product that takes part in title matching (type `game` or untyped).
pub fn load_matchable_products(conn: &Connection) -> Result<Vec<GogProduct>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT gog_product_id, title, normalized_title, product_type, slug
         FROM gogdb_products
         WHERE product_type IS NULL OR LOWER(product_type) = 'game'
         ORDER BY gog_product_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(GogProduct {
            gog_product_id: row.get(0)?,
            title: row.get(1)?,
            normalized_title: row.get(2)?,
            product_type: row.get(3)?,
            slug: row.get(4)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Match Results ───────────────────────────────────────────────────────────

/// Find the stored match result for a Steam game.
pub fn find_match_result(
    conn: &Connection,
    steam_app_id: i64,
) -> Result<Option<MatchResult>, OperationError> {
    conn.query_row(
        "SELECT steam_app_id, gog_product_id, match_method, match_score
         FROM gogdb_games WHERE steam_app_id = ?1",
        [steam_app_id],
        row_to_match_result,
    )
    .optional()
    .map_err(Into::into)
}

/// List all stored match results ordered by Steam app id.
pub fn list_match_results(conn: &Connection) -> Result<Vec<MatchResult>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT steam_app_id, gog_product_id, match_method, match_score
         FROM gogdb_games ORDER BY steam_app_id",
    )?;
    let rows = stmt.query_map([], row_to_match_result)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Result counts per match method.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub exact: i64,
    pub norm_exact: i64,
    pub like_unique: i64,
    pub unmatched: i64,
    /// Steam games with no stored result yet.
    pub pending: i64,
}

impl MatchSummary {
    pub fn matched(&self) -> i64 {
        self.exact + self.norm_exact + self.like_unique
    }
}

/// Count stored results by method.
pub fn match_summary(conn: &Connection) -> Result<MatchSummary, OperationError> {
    let mut summary = MatchSummary::default();

    let mut stmt = conn.prepare(
        "SELECT match_method, COUNT(*) FROM gogdb_games GROUP BY match_method",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((parse_method(row, 0)?, row.get::<_, i64>(1)?))
    })?;
    for row in rows {
        let (method, count) = row?;
        match method {
            MatchMethod::Exact => summary.exact = count,
            MatchMethod::NormExact => summary.norm_exact = count,
            MatchMethod::LikeUnique => summary.like_unique = count,
            MatchMethod::None => summary.unmatched = count,
        }
    }

    summary.pending = conn.query_row(
        "SELECT COUNT(*) FROM steam_games s
         WHERE NOT EXISTS (SELECT 1 FROM gogdb_games g WHERE g.steam_app_id = s.steam_app_id)",
        [],
        |row| row.get(0),
    )?;

    Ok(summary)
}

/// Steam games whose stored result is `none`, most played first.
pub fn unmatched_games(conn: &Connection) -> Result<Vec<SteamGame>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT s.steam_app_id, s.title, s.playtime_forever_min, s.playtime_2weeks_min, s.last_updated_utc
         FROM steam_games s
         JOIN gogdb_games g ON g.steam_app_id = s.steam_app_id
         WHERE g.match_method = 'none'
         ORDER BY s.playtime_forever_min DESC, s.steam_app_id ASC",
    )?;
    let rows = stmt.query_map([], row_to_steam_game)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Prices ──────────────────────────────────────────────────────────────────

/// Most recent observed price of a product in a country and currency.
pub fn latest_price(
    conn: &Connection,
    gog_product_id: i64,
    country: &str,
    currency: &str,
) -> Result<Option<GogPrice>, OperationError> {
    conn.query_row(
        "SELECT gog_product_id, country, currency, base_price_minor_units,
                discounted_price_minor_units, observed_at
         FROM gogdb_prices
         WHERE gog_product_id = ?1 AND country = ?2 AND currency = ?3
         ORDER BY observed_at DESC LIMIT 1",
        params![gog_product_id, country, currency],
        row_to_price,
    )
    .optional()
    .map_err(Into::into)
}

/// Full price history of a product, oldest first.
pub fn price_history(conn: &Connection, gog_product_id: i64) -> Result<Vec<GogPrice>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT gog_product_id, country, currency, base_price_minor_units,
                discounted_price_minor_units, observed_at
         FROM gogdb_prices WHERE gog_product_id = ?1
         ORDER BY country, currency, observed_at",
    )?;
    let rows = stmt.query_map([gog_product_id], row_to_price)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// One matched game in the repurchase cost report.
#[derive(Debug, Clone)]
pub struct CostRow {
    pub steam_app_id: i64,
    pub steam_title: String,
    pub gog_product_id: i64,
    pub gog_title: String,
    pub match_method: MatchMethod,
    /// Latest price in the requested country/currency, if GOGDB has one.
    pub price: Option<GogPrice>,
}

/// Matched games with their latest price in a country and currency.
pub fn cost_rows(
    conn: &Connection,
    country: &str,
    currency: &str,
) -> Result<Vec<CostRow>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT s.steam_app_id, s.title, p.gog_product_id, p.title, g.match_method
         FROM gogdb_games g
         JOIN steam_games s ON s.steam_app_id = g.steam_app_id
         JOIN gogdb_products p ON p.gog_product_id = g.gog_product_id
         ORDER BY s.playtime_forever_min DESC, s.steam_app_id ASC",
    )?;
    let matched = stmt
        .query_map([], |row| {
            Ok(CostRow {
                steam_app_id: row.get(0)?,
                steam_title: row.get(1)?,
                gog_product_id: row.get(2)?,
                gog_title: row.get(3)?,
                match_method: parse_method(row, 4)?,
                price: None,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    matched
        .into_iter()
        .map(|mut row| {
            row.price = latest_price(conn, row.gog_product_id, country, currency)?;
            Ok(row)
        })
        .collect()
}

// ── Stats & Logs ────────────────────────────────────────────────────────────

/// Aggregate row counts.
#[derive(Debug, Default)]
pub struct CatalogStats {
    pub steam_games: i64,
    pub gog_products: i64,
    pub gog_games: i64,
    pub gog_prices: i64,
    pub match_results: i64,
}

/// Count rows in every table.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let count = |sql: &str| -> Result<i64, OperationError> {
        Ok(conn.query_row(sql, [], |row| row.get(0))?)
    };

    Ok(CatalogStats {
        steam_games: count("SELECT COUNT(*) FROM steam_games")?,
        gog_products: count("SELECT COUNT(*) FROM gogdb_products")?,
        gog_games: count(
            "SELECT COUNT(*) FROM gogdb_products WHERE product_type IS NULL OR LOWER(product_type) = 'game'",
        )?,
        gog_prices: count("SELECT COUNT(*) FROM gogdb_prices")?,
        match_results: count("SELECT COUNT(*) FROM gogdb_games")?,
    })
}

/// List recent import logs, newest first.
pub fn list_import_logs(
    conn: &Connection,
    limit: Option<u32>,
) -> Result<Vec<ImportLog>, OperationError> {
    let limit = limit.unwrap_or(20);
    let mut stmt = conn.prepare(
        "SELECT id, source_type, source_name, imported_at,
                records_created, records_updated, records_unchanged
         FROM import_log ORDER BY imported_at DESC, id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map([limit], |row| {
        Ok(ImportLog {
            id: row.get(0)?,
            source_type: row.get(1)?,
            source_name: row.get(2)?,
            imported_at: row.get(3)?,
            records_created: row.get(4)?,
            records_updated: row.get(5)?,
            records_unchanged: row.get(6)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

fn row_to_steam_game(row: &rusqlite::Row<'_>) -> rusqlite::Result<SteamGame> {
    Ok(SteamGame {
        steam_app_id: row.get(0)?,
        title: row.get(1)?,
        playtime_forever_min: row.get(2)?,
        playtime_2weeks_min: row.get(3)?,
        last_updated_utc: row.get(4)?,
    })
}

fn row_to_match_result(row: &rusqlite::Row<'_>) -> rusqlite::Result<MatchResult> {
    Ok(MatchResult {
        steam_app_id: row.get(0)?,
        gog_product_id: row.get(1)?,
        match_method: parse_method(row, 2)?,
        match_score: row.get(3)?,
    })
}

fn row_to_price(row: &rusqlite::Row<'_>) -> rusqlite::Result<GogPrice> {
    Ok(GogPrice {
        gog_product_id: row.get(0)?,
        country: row.get(1)?,
        currency: row.get(2)?,
        base_price_minor_units: row.get(3)?,
        discounted_price_minor_units: row.get(4)?,
        observed_at: row.get(5)?,
    })
}

fn parse_method(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<MatchMethod> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

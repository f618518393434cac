//! SQLite persistence layer for the Steam library, the GOGDB catalog and
//! the match results.
//!
//! Provides schema creation, idempotent upserts and query APIs backed by
//! SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    OperationError, UpsertOutcome, insert_gog_price, insert_import_log, upsert_gog_product,
    upsert_match_result, upsert_steam_game,
};
pub use queries::{
    CatalogStats, CostRow, MatchSummary, catalog_stats, cost_rows, find_match_result,
    latest_price, list_import_logs, list_match_results, load_matchable_products,
    load_steam_games, match_summary, price_history, unmatched_games,
};
pub use rusqlite::Connection;
pub use schema::{SchemaError, open_database, open_memory};

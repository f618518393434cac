//! Index a GOGDB dump into the catalog database.
//!
//! Products are upserted by id and every dated price entry is appended to the
//! price history. The whole dump is indexed in one transaction, so matching
//! never sees a half-indexed catalog.

use std::path::Path;

use rusqlite::Connection;
use steam_gog_catalog::types::*;
use steam_gog_db::operations::{self, OperationError, UpsertOutcome};
use steam_gog_gogdb::{GogdbError, list_product_dirs, read_product};
use thiserror::Error;

use crate::progress::ImportProgress;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("GOGDB error: {0}")]
    Gogdb(#[from] GogdbError),
}

/// Statistics from a single dump import.
#[derive(Debug, Default)]
pub struct GogdbImportStats {
    pub products_created: u64,
    pub products_updated: u64,
    pub products_unchanged: u64,
    /// Product directories without a usable product.json.
    pub products_skipped: u64,
    pub prices_inserted: u64,
    pub prices_existing: u64,
    /// Price entries without a date or base price.
    pub prices_skipped: u64,
    pub total_products: u64,
}

/// Index every product under `dump_root` into the database.
pub fn import_gogdb_dump(
    conn: &Connection,
    dump_root: &Path,
    progress: Option<&dyn ImportProgress>,
) -> Result<GogdbImportStats, ImportError> {
    let dirs = list_product_dirs(dump_root)?;
    let mut stats = GogdbImportStats {
        total_products: dirs.len() as u64,
        ..Default::default()
    };

    if let Some(p) = progress {
        p.on_phase(&format!(
            "Indexing {} ({} products)",
            source_name(dump_root),
            dirs.len()
        ));
    }

    let tx = conn.unchecked_transaction()?;

    for (i, (id, dir)) in dirs.iter().enumerate() {
        let name = match read_product(*id, dir) {
            Ok(Some(entry)) => {
                match operations::upsert_gog_product(&tx, &entry.product)? {
                    UpsertOutcome::Created => stats.products_created += 1,
                    UpsertOutcome::Updated => stats.products_updated += 1,
                    UpsertOutcome::Unchanged => stats.products_unchanged += 1,
                }
                for price in &entry.prices {
                    if operations::insert_gog_price(&tx, price)? {
                        stats.prices_inserted += 1;
                    } else {
                        stats.prices_existing += 1;
                    }
                }
                stats.prices_skipped += entry.skipped_prices as u64;
                entry.product.title
            }
            Ok(None) => {
                stats.products_skipped += 1;
                String::new()
            }
            Err(GogdbError::Json { path, source }) => {
                log::warn!("Skipping unreadable {path}: {source}");
                stats.products_skipped += 1;
                String::new()
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(p) = progress {
            p.on_item(i + 1, dirs.len(), &name);
        }
    }

    log_import(&tx, "gogdb", &source_name(dump_root), &stats)?;
    tx.commit()?;

    if let Some(p) = progress {
        p.on_complete(&format!(
            "Indexed {} products ({} new, {} updated), {} new prices",
            stats.total_products - stats.products_skipped,
            stats.products_created,
            stats.products_updated,
            stats.prices_inserted
        ));
    }

    Ok(stats)
}

/// Log a dump import to the import_log table.
pub fn log_import(
    conn: &Connection,
    source_type: &str,
    source_name: &str,
    stats: &GogdbImportStats,
) -> Result<i64, ImportError> {
    let log_entry = ImportLog {
        id: 0,
        source_type: source_type.to_string(),
        source_name: source_name.to_string(),
        imported_at: timestamp_now(),
        records_created: stats.products_created as i64,
        records_updated: stats.products_updated as i64,
        records_unchanged: stats.products_unchanged as i64,
    };
    Ok(operations::insert_import_log(conn, &log_entry)?)
}

fn source_name(dump_root: &Path) -> String {
    dump_root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dump_root.display().to_string())
}

//! Import the owned Steam library into the catalog database.

use rusqlite::Connection;
use steam_gog_catalog::types::*;
use steam_gog_db::operations::{self, UpsertOutcome};

use crate::gogdb_import::ImportError;
use crate::progress::ImportProgress;

/// Statistics from a Steam library import.
#[derive(Debug, Default)]
pub struct SteamImportStats {
    pub created: u64,
    pub updated: u64,
    pub unchanged: u64,
    /// Games the API returned without a name.
    pub nameless: u64,
    pub total_games: u64,
}

/// Upsert owned games keyed by app id, in one transaction.
///
/// `source_name` identifies the library in the import log (usually the
/// SteamID64).
pub fn import_steam_library(
    conn: &Connection,
    games: &[SteamGame],
    source_name: &str,
    progress: Option<&dyn ImportProgress>,
) -> Result<SteamImportStats, ImportError> {
    let mut stats = SteamImportStats {
        total_games: games.len() as u64,
        ..Default::default()
    };

    let tx = conn.unchecked_transaction()?;

    for (i, game) in games.iter().enumerate() {
        if game.title.trim().is_empty() {
            log::warn!("Steam app {} has no name; it will never match", game.steam_app_id);
            stats.nameless += 1;
        }
        match operations::upsert_steam_game(&tx, game)? {
            UpsertOutcome::Created => stats.created += 1,
            UpsertOutcome::Updated => stats.updated += 1,
            UpsertOutcome::Unchanged => stats.unchanged += 1,
        }
        if let Some(p) = progress {
            p.on_item(i + 1, games.len(), &game.title);
        }
    }

    operations::insert_import_log(
        &tx,
        &ImportLog {
            id: 0,
            source_type: "steam".to_string(),
            source_name: source_name.to_string(),
            imported_at: timestamp_now(),
            records_created: stats.created as i64,
            records_updated: stats.updated as i64,
            records_unchanged: stats.unchanged as i64,
        },
    )?;
    tx.commit()?;

    if let Some(p) = progress {
        p.on_complete(&format!(
            "Saved {} games ({} new, {} updated)",
            stats.total_games, stats.created, stats.updated
        ));
    }

    Ok(stats)
}

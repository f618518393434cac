use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::commands::open_existing_db;

pub(crate) fn run_gog_stats(db_path: &Path) -> Result<(), CliError> {
    let conn = open_existing_db(db_path)?;

    let stats = steam_gog_db::catalog_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query database stats: {}", e)))?;
    let summary = steam_gog_db::match_summary(&conn)
        .map_err(|e| CliError::database(format!("Failed to query match summary: {}", e)))?;
    let logs = steam_gog_db::list_import_logs(&conn, Some(10))
        .map_err(|e| CliError::database(format!("Failed to query import log: {}", e)))?;

    log::info!(
        "{}",
        "Database Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    log::info!("  Steam games:    {:>8}", stats.steam_games);
    log::info!("  GOG products:   {:>8}", stats.gog_products);
    log::info!("    games:        {:>8}", stats.gog_games);
    log::info!("  GOG prices:     {:>8}", stats.gog_prices);
    log::info!("  Match results:  {:>8}", stats.match_results);
    crate::log_blank();
    log::info!("  Matched:        {:>8}", summary.matched());
    log::info!("    exact:        {:>8}", summary.exact);
    log::info!("    normalized:   {:>8}", summary.norm_exact);
    log::info!("    substring:    {:>8}", summary.like_unique);
    log::info!("  Unmatched:      {:>8}", summary.unmatched);
    if summary.pending > 0 {
        log::info!(
            "  Not yet matched:{:>8} {}",
            summary.pending,
            "(run 'steam-gog gog match')".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    if !logs.is_empty() {
        crate::log_blank();
        log::info!("{}", "Recent Imports".if_supports_color(Stdout, |t| t.bold()));
        for entry in &logs {
            log::info!(
                "  {}  {:<6} {:<28} +{} ~{} ={}",
                entry.imported_at.if_supports_color(Stdout, |t| t.dimmed()),
                entry.source_type,
                entry.source_name,
                entry.records_created,
                entry.records_updated,
                entry.records_unchanged,
            );
        }
    }

    Ok(())
}

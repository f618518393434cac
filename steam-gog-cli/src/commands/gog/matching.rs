use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use steam_gog_import::{MatchOptions, MatchRunError, run_matching};
use steam_gog_matcher::MatchConfig;

use crate::CliError;
use crate::commands::open_existing_db;
use crate::progress::import_progress;

pub(crate) fn run_gog_match(
    db_path: &Path,
    limit: Option<usize>,
    min_like_length: usize,
    quiet: bool,
) -> Result<(), CliError> {
    let conn = open_existing_db(db_path)?;
    let options = MatchOptions {
        limit,
        config: MatchConfig { min_like_length },
    };

    let progress = import_progress(quiet);
    let stats = run_matching(&conn, &options, Some(progress.as_ref())).map_err(|e| match e {
        MatchRunError::EmptyCatalog => CliError::config(e.to_string()),
        MatchRunError::Db(_) => CliError::database(e.to_string()),
    })?;

    let pct = if stats.processed > 0 {
        stats.matched() as f64 / stats.processed as f64 * 100.0
    } else {
        0.0
    };

    crate::log_blank();
    log::info!(
        "{}",
        "Match Results".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Steam games:    {:>8}", stats.processed);
    log::info!("  GOG games:      {:>8}", stats.indexed_products);
    log::info!(
        "  Matched:        {:>8} ({:.1}%)",
        stats.matched().if_supports_color(Stdout, |t| t.green()),
        pct
    );
    log::info!("    exact:        {:>8}", stats.exact);
    log::info!("    normalized:   {:>8}", stats.norm_exact);
    log::info!("    substring:    {:>8}", stats.like_unique);
    log::info!("  Unmatched:      {:>8}", stats.unmatched);
    if stats.ambiguous > 0 {
        log::info!(
            "  Ambiguous:      {:>8} {}",
            stats.ambiguous,
            "(several candidates at some tier)"
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!(
        "  Rows:           {:>8} new, {} changed, {} unchanged",
        stats.created,
        stats.updated,
        stats.unchanged
    );
    Ok(())
}

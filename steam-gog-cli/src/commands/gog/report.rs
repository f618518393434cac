use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use steam_gog_catalog::format_minor_units;
use steam_gog_import::{CostReport, cost_report, write_cost_report_csv, write_unmatched_csv};

use crate::CliError;
use crate::commands::{open_existing_db, truncate_str};

pub(crate) fn run_cost_report(
    db_path: &Path,
    country: &str,
    currency: &str,
    out_csv: Option<PathBuf>,
) -> Result<(), CliError> {
    let conn = open_existing_db(db_path)?;
    let report = cost_report(&conn, country, currency)
        .map_err(|e| CliError::database(format!("Failed to build cost report: {}", e)))?;

    log::info!(
        "{}",
        format!(
            "Repurchase cost on GOG ({} / {})",
            report.country, report.currency
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if let Some(path) = out_csv {
        write_report_csv(&path, &report)?;
    }

    if report.rows.is_empty() {
        log::warn!("No matched games. Run 'steam-gog gog match' first.");
        return Ok(());
    }

    log::info!(
        "  {:<40}  {:<12}  {:>12}  {:>12}  {:>4}",
        "title",
        "method",
        "base",
        "now",
        "off"
    );
    for row in &report.rows {
        let (base, now, off) = match &row.price {
            Some(price) => (
                format_minor_units(price.base_price_minor_units, &report.currency),
                format_minor_units(price.discounted_price_minor_units, &report.currency),
                discount_label(price.discount_pct()),
            ),
            None => ("-".to_string(), "-".to_string(), String::new()),
        };
        log::info!(
            "  {:<40}  {:<12}  {:>12}  {:>12}  {:>4}",
            truncate_str(&row.gog_title, 40),
            row.match_method.as_str(),
            base,
            now,
            off,
        );
    }

    crate::log_blank();
    log::info!("  Matched games:  {:>8}", report.rows.len());
    log::info!("  Priced:         {:>8}", report.priced());
    if report.unpriced > 0 {
        log::info!(
            "  {}      {:>8}",
            "No price:".if_supports_color(Stdout, |t| t.yellow()),
            report.unpriced
        );
    }
    log::info!(
        "  Total (base):   {:>14}",
        format_minor_units(report.total_base_minor_units, &report.currency)
    );
    log::info!(
        "  Total (now):    {:>14}",
        format_minor_units(report.total_discounted_minor_units, &report.currency)
            .if_supports_color(Stdout, |t| t.green()),
    );

    Ok(())
}

/// List Steam games with no GOG match, most played first.
pub(crate) fn run_unmatched_report(db_path: &Path, out_csv: Option<PathBuf>) -> Result<(), CliError> {
    let conn = open_existing_db(db_path)?;
    let games = steam_gog_db::unmatched_games(&conn)
        .map_err(|e| CliError::database(format!("Failed to query unmatched games: {}", e)))?;

    log::info!(
        "{}",
        format!("{} unmatched Steam games", games.len()).if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    for game in &games {
        log::info!(
            "  {:>8}  {}",
            game.steam_app_id.if_supports_color(Stdout, |t| t.dimmed()),
            game.title,
        );
    }

    if let Some(path) = out_csv {
        let file = std::fs::File::create(&path)?;
        write_unmatched_csv(file, &games)
            .map_err(|e| CliError::other(format!("Failed to write {}: {}", path.display(), e)))?;
        log::info!("Wrote {}", path.display());
    }
    Ok(())
}

fn discount_label(pct: i64) -> String {
    if pct > 0 { format!("-{pct}%") } else { String::new() }
}

/// Write the cost report CSV. An empty report still gets its header row.
fn write_report_csv(path: &Path, report: &CostReport) -> Result<(), CliError> {
    let file = std::fs::File::create(path)?;
    write_cost_report_csv(file, report)
        .map_err(|e| CliError::other(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

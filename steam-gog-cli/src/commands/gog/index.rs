use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use steam_gog_gogdb::find_valid_dump_root;
use steam_gog_import::ImportError;

use crate::CliError;
use crate::commands::open_db;
use crate::progress::import_progress;

/// Index the newest valid dump under `dump_dir` into the database.
///
/// With `fetch`, a missing dump is downloaded first.
pub(crate) fn run_gog_index(
    db_path: &Path,
    dump_dir: PathBuf,
    fetch: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let found = find_valid_dump_root(&dump_dir).map_err(|e| CliError::gogdb(e.to_string()))?;
    let root = match found {
        Some(root) => root,
        None if fetch => super::fetch::run_gog_fetch(dump_dir, false, quiet)?,
        None => {
            return Err(CliError::config(format!(
                "No valid gogdb_YYYY-MM-DD dump under {}. Run 'steam-gog gog fetch' or pass --fetch.",
                dump_dir.display()
            )));
        }
    };

    let conn = open_db(db_path)?;
    log::info!(
        "{}",
        format!("Indexing {} into {}", root.display(), db_path.display())
            .if_supports_color(Stdout, |t| t.bold()),
    );

    let progress = import_progress(quiet);
    let stats = steam_gog_import::import_gogdb_dump(&conn, &root, Some(progress.as_ref()))
        .map_err(index_error)?;

    crate::log_blank();
    log::info!("  Products:       {:>8}", stats.total_products);
    log::info!("    new:          {:>8}", stats.products_created);
    log::info!("    updated:      {:>8}", stats.products_updated);
    log::info!("    unchanged:    {:>8}", stats.products_unchanged);
    if stats.products_skipped > 0 {
        log::info!(
            "    {}       {:>8}",
            "skipped:".if_supports_color(Stdout, |t| t.yellow()),
            stats.products_skipped
        );
    }
    log::info!("  Prices added:   {:>8}", stats.prices_inserted);
    log::info!("  Prices known:   {:>8}", stats.prices_existing);
    if stats.prices_skipped > 0 {
        log::info!("  Prices skipped: {:>8}", stats.prices_skipped);
    }
    Ok(())
}

/// Dump read failures are reported as GOGDB errors, the rest as database errors.
fn index_error(e: ImportError) -> CliError {
    match e {
        ImportError::Gogdb(e) => CliError::gogdb(e.to_string()),
        e => CliError::database(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steam_gog_gogdb::GogdbError;

    #[test]
    fn dump_errors_are_gogdb_errors() {
        let err = index_error(ImportError::Gogdb(GogdbError::invalid_dump("no products/")));
        assert!(matches!(err, CliError::Gogdb(_)));
        assert_eq!(err.to_string(), "GOGDB error: Invalid dump: no products/");
    }

    #[test]
    fn missing_dump_dir_is_gogdb_error() {
        let base = tempfile::tempdir().unwrap();
        let conn = steam_gog_db::open_memory().unwrap();
        let err = steam_gog_import::import_gogdb_dump(&conn, base.path(), None)
            .map_err(index_error)
            .unwrap_err();
        assert!(matches!(err, CliError::Gogdb(_)));
    }
}

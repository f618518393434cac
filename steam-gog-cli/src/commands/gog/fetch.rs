use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use steam_gog_gogdb::{FetchOptions, fetch_latest_dump};

use crate::CliError;
use crate::progress::FetchProgress;

/// Download and unpack the newest GOGDB backup into `dir`.
pub(crate) fn run_gog_fetch(dir: PathBuf, keep_archive: bool, quiet: bool) -> Result<PathBuf, CliError> {
    log::info!(
        "{}",
        format!("Fetching the latest GOGDB dump into {}", dir.display())
            .if_supports_color(Stdout, |t| t.bold()),
    );

    let mut options = FetchOptions::new(dir);
    options.keep_archive = keep_archive;

    let progress = FetchProgress::new(quiet);
    let root = fetch_latest_dump(&options, &progress).map_err(|e| CliError::gogdb(e.to_string()))?;

    log::info!(
        "{} Dump ready at {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        root.display(),
    );
    Ok(root)
}

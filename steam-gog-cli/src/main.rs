//! steam-gog CLI
//!
//! Fetches a Steam library, indexes GOGDB dumps and matches the two.

mod cli_types;
mod commands;
mod error;
mod logger;
mod progress;
mod settings;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction, GogAction};
pub(crate) use error::CliError;

/// Print an empty line through the logger so it also reaches the logfile.
pub(crate) fn log_blank() {
    log::info!("");
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to set up logging: {e}");
        std::process::exit(1);
    }

    if let Ok(path) = dotenv::dotenv() {
        log::debug!("Loaded environment from {}", path.display());
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let quiet = cli.quiet;
    let settings = settings::Settings::load()?;

    match cli.command {
        Commands::Steam {
            account,
            sqlite,
            out_csv,
            print_sample,
        } => commands::steam::run_steam(account, sqlite, out_csv, print_sample, quiet),
        Commands::Gog { action } => match action {
            GogAction::Fetch { dir, keep_archive } => {
                commands::gog::fetch::run_gog_fetch(settings.dump_dir(dir), keep_archive, quiet)
                    .map(|_| ())
            }
            GogAction::Index {
                sqlite_db,
                dump_dir,
                fetch,
            } => commands::gog::index::run_gog_index(
                &sqlite_db,
                settings.dump_dir(dump_dir),
                fetch,
                quiet,
            ),
            GogAction::Match {
                sqlite_db,
                limit,
                min_like_len,
            } => commands::gog::matching::run_gog_match(
                &sqlite_db,
                limit,
                settings.min_like_length(min_like_len),
                quiet,
            ),
            GogAction::Report {
                sqlite_db,
                country,
                currency,
                unmatched,
                out_csv,
            } => {
                if unmatched {
                    commands::gog::report::run_unmatched_report(&sqlite_db, out_csv)
                } else {
                    commands::gog::report::run_cost_report(
                        &sqlite_db,
                        &settings.country(country),
                        &settings.currency(currency),
                        out_csv,
                    )
                }
            }
            GogAction::Stats { sqlite_db } => commands::gog::stats::run_gog_stats(&sqlite_db),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&settings),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    }
}

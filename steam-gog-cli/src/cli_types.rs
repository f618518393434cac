//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "steam-gog")]
#[command(about = "Match a Steam library against the GOGDB catalog", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which Steam account to read. Falls back to the configured `steam_id`.
#[derive(Args, Clone)]
#[group(required = false, multiple = false)]
pub(crate) struct SteamAccountArgs {
    /// Vanity name from the profile URL (steamcommunity.com/id/<name>)
    #[arg(long)]
    pub vanity: Option<String>,

    /// SteamID64 of the account
    #[arg(long)]
    pub steamid: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Fetch the owned games of a Steam account
    Steam {
        #[command(flatten)]
        account: SteamAccountArgs,

        /// Save the library into this SQLite database instead of a CSV file
        #[arg(long)]
        sqlite: Option<PathBuf>,

        /// CSV output path when --sqlite is not given
        #[arg(long, default_value = "steam_games.csv")]
        out_csv: PathBuf,

        /// Print the total and the first N games instead of saving
        #[arg(long, value_name = "N")]
        print_sample: Option<usize>,
    },

    /// Work with the GOGDB catalog
    Gog {
        #[command(subcommand)]
        action: GogAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum GogAction {
    /// Download and unpack the latest GOGDB dump
    Fetch {
        /// Directory to unpack into (default: settings, then the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Keep the downloaded .tar.xz after unpacking
        #[arg(long)]
        keep_archive: bool,
    },

    /// Load the newest valid dump into the database
    Index {
        /// SQLite database to write
        #[arg(long)]
        sqlite_db: PathBuf,

        /// Directory holding gogdb_YYYY-MM-DD dumps
        #[arg(long)]
        dump_dir: Option<PathBuf>,

        /// Download the latest dump first if no valid one is found
        #[arg(long)]
        fetch: bool,
    },

    /// Match stored Steam games against the indexed catalog
    Match {
        /// SQLite database holding the library and the catalog
        #[arg(long)]
        sqlite_db: PathBuf,

        /// Only match the N most played games
        #[arg(long)]
        limit: Option<usize>,

        /// Minimum Steam title length for substring matches
        #[arg(long)]
        min_like_len: Option<usize>,
    },

    /// Estimate the repurchase cost of matched games, or list unmatched ones
    Report {
        /// SQLite database holding the match results
        #[arg(long)]
        sqlite_db: PathBuf,

        /// Price country code (e.g., US, DE)
        #[arg(long)]
        country: Option<String>,

        /// Price currency code (e.g., USD, EUR)
        #[arg(long)]
        currency: Option<String>,

        /// List unmatched games instead of prices
        #[arg(long)]
        unmatched: bool,

        /// Also write the report as CSV
        #[arg(long)]
        out_csv: Option<PathBuf>,
    },

    /// Show database statistics and recent imports
    Stats {
        /// SQLite database to inspect
        #[arg(long)]
        sqlite_db: PathBuf,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current credentials (masked) and settings
    Show,
    /// Print the config file paths
    Path,
}

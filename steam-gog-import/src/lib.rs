//! Load data sources into the catalog database and run title matching.
//!
//! This crate owns the ETL steps: indexing a GOGDB dump, importing the Steam
//! library, matching every Steam game against the indexed catalog, and
//! building the reports derived from the stored results.

pub mod export;
pub mod gogdb_import;
pub mod match_run;
pub mod progress;
pub mod report;
pub mod steam_import;

pub use export::{write_cost_report_csv, write_library_csv, write_unmatched_csv};
pub use gogdb_import::{GogdbImportStats, ImportError, import_gogdb_dump, log_import};
pub use match_run::{MatchOptions, MatchRunError, MatchStats, run_matching};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
pub use report::{CostReport, cost_report};
pub use steam_import::{SteamImportStats, import_steam_library};

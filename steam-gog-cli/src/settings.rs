//! User settings from `settings.toml`.
//!
//! ```toml
//! [matching]
//! min_like_length = 6
//!
//! [report]
//! country = "US"
//! currency = "USD"
//!
//! [gogdb]
//! dump_dir = "/data/gogdb"
//! ```
//!
//! Command-line flags override every value here.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use steam_gog_matcher::DEFAULT_MIN_LIKE_LENGTH;

use crate::CliError;

pub(crate) const DEFAULT_COUNTRY: &str = "US";
pub(crate) const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub matching: MatchingSettings,
    pub report: ReportSettings,
    pub gogdb: GogdbSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MatchingSettings {
    pub min_like_length: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ReportSettings {
    pub country: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GogdbSettings {
    pub dump_dir: Option<PathBuf>,
}

impl Settings {
    /// Load from the user config dir. A missing file gives the defaults.
    pub(crate) fn load() -> Result<Self, CliError> {
        match settings_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub(crate) fn load_from(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| CliError::config(format!("Invalid {}: {}", path.display(), e)))
    }

    pub(crate) fn min_like_length(&self, flag: Option<usize>) -> usize {
        flag.or(self.matching.min_like_length)
            .unwrap_or(DEFAULT_MIN_LIKE_LENGTH)
    }

    pub(crate) fn country(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.report.country.clone())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string())
    }

    pub(crate) fn currency(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.report.currency.clone())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
    }

    pub(crate) fn dump_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.gogdb.dump_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub(crate) fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("steam-gog").join("settings.toml"))
}

use std::path::{Path, PathBuf};

use crate::error::SteamError;

/// Environment variables checked for the API key, in priority order.
pub const API_KEY_VARS: &[&str] = &["STEAM_API_KEY", "KEY"];
pub const STEAM_ID_VAR: &str = "STEAM_ID";

/// Credentials for the Steam Web API.
#[derive(Debug, Clone)]
pub struct SteamCredentials {
    pub api_key: String,
    /// Default SteamID64 used when neither `--steamid` nor `--vanity` is given.
    pub steam_id: Option<String>,
}

/// Where a credential field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    EnvVar(&'static str),
    ConfigFile,
    Missing,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize)]
struct ConfigFile {
    steam: Option<SteamConfig>,
}

#[derive(Debug, Default, Clone, serde::Deserialize)]
struct SteamConfig {
    api_key: Option<String>,
    steam_id: Option<String>,
}

impl SteamCredentials {
    /// Load credentials from environment variables or the config file.
    ///
    /// Priority: `STEAM_API_KEY` > `KEY` > `[steam] api_key` in
    /// [`config_path`]. Call `dotenv` first to pick up a `.env` file.
    pub fn load() -> Result<Self, SteamError> {
        let config = config_path().and_then(|p| load_config_file(&p));
        Self::resolve(|var| std::env::var(var).ok(), config)
    }

    /// Load with an explicit config file instead of the user config dir.
    pub fn load_from(path: &Path) -> Result<Self, SteamError> {
        Self::resolve(|var| std::env::var(var).ok(), load_config_file(path))
    }

    fn resolve(
        env: impl Fn(&str) -> Option<String>,
        config: Option<SteamConfig>,
    ) -> Result<Self, SteamError> {
        let config = config.unwrap_or_default();
        let (api_key, source) = resolve_api_key(&env, &config);
        let api_key = api_key.ok_or_else(|| {
            SteamError::config(
                "Missing Steam API key. Set STEAM_API_KEY (or KEY) or add [steam] api_key to the config file",
            )
        })?;
        log::debug!("Steam API key from {source}");

        let steam_id = env(STEAM_ID_VAR)
            .filter(|v| !v.trim().is_empty())
            .or(config.steam_id)
            .map(|v| v.trim().to_string());

        Ok(Self { api_key, steam_id })
    }
}

fn resolve_api_key(
    env: &impl Fn(&str) -> Option<String>,
    config: &SteamConfig,
) -> (Option<String>, CredentialSource) {
    for &var in API_KEY_VARS {
        if let Some(value) = env(var).filter(|v| !v.trim().is_empty()) {
            return (Some(value.trim().to_string()), CredentialSource::EnvVar(var));
        }
    }
    match config.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => (Some(key.to_string()), CredentialSource::ConfigFile),
        _ => (None, CredentialSource::Missing),
    }
}

/// Determine where the API key is coming from, without loading it.
pub fn api_key_source() -> CredentialSource {
    let config = config_path()
        .and_then(|p| load_config_file(&p))
        .unwrap_or_default();
    resolve_api_key(&|var: &str| std::env::var(var).ok(), &config).1
}

/// Return the path to the credentials config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("steam-gog").join("credentials.toml"))
}

fn load_config_file(path: &Path) -> Option<SteamConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<ConfigFile>(&content) {
        Ok(config) => config.steam,
        Err(e) => {
            log::warn!("Ignoring unreadable {}: {e}", path.display());
            None
        }
    }
}

use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use steam_gog_steam::{CredentialSource, SteamCredentials};

use crate::CliError;
use crate::settings::{Settings, settings_path};

fn mask_value(s: &str) -> String {
    match s.char_indices().nth(4) {
        Some((end, _)) => format!("{}****", &s[..end]),
        None => "****".to_string(),
    }
}

fn log_file_status(label: &str, path: Option<&Path>) {
    match path {
        Some(p) if p.exists() => log::info!(
            "  {}: {} {}",
            label,
            p.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        ),
        Some(p) => log::info!(
            "  {}: {} {}",
            label,
            p.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        None => log::info!(
            "  {}: {}",
            label,
            "could not determine path".if_supports_color(Stdout, |t| t.red()),
        ),
    }
}

/// Show the API key source (masked), the default account and the settings.
pub(crate) fn run_config_show(settings: &Settings) -> Result<(), CliError> {
    log::info!("{}", "Configuration".if_supports_color(Stdout, |t| t.bold()));
    crate::log_blank();
    log_file_status("Credentials", steam_gog_steam::config_path().as_deref());
    log_file_status("Settings   ", settings_path().as_deref());
    crate::log_blank();

    let source = steam_gog_steam::api_key_source();
    let creds = SteamCredentials::load().ok();
    match (&source, &creds) {
        (CredentialSource::Missing, _) | (_, None) => log::info!(
            "  {:<16} {}",
            "api_key",
            "not set".if_supports_color(Stdout, |t| t.red()),
        ),
        (source, Some(c)) => log::info!(
            "  {:<16} {} {}",
            "api_key",
            mask_value(&c.api_key),
            format!("({source})").if_supports_color(Stdout, |t| t.dimmed()),
        ),
    }
    log::info!(
        "  {:<16} {}",
        "steam_id",
        creds
            .as_ref()
            .and_then(|c| c.steam_id.clone())
            .unwrap_or_else(|| "-".to_string()),
    );
    log::info!("  {:<16} {}", "min_like_length", settings.min_like_length(None));
    log::info!(
        "  {:<16} {} / {}",
        "report",
        settings.country(None),
        settings.currency(None)
    );
    log::info!("  {:<16} {}", "dump_dir", settings.dump_dir(None).display());
    Ok(())
}

pub(crate) fn run_config_path() -> Result<(), CliError> {
    let paths = [steam_gog_steam::config_path(), settings_path()];
    if paths.iter().all(Option::is_none) {
        return Err(CliError::config("Could not determine the config directory"));
    }
    for path in paths.into_iter().flatten() {
        log::info!("{}", path.display());
    }
    Ok(())
}

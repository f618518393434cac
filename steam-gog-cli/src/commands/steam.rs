use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use steam_gog_catalog::{SteamGame, timestamp_now};
use steam_gog_steam::{SteamClient, SteamCredentials};

use crate::CliError;
use crate::cli_types::SteamAccountArgs;
use crate::progress::{import_progress, spinner};

use super::{open_db, truncate_str};

/// Fetch the owned games of a Steam account and save, export or print them.
pub(crate) fn run_steam(
    account: SteamAccountArgs,
    sqlite: Option<PathBuf>,
    out_csv: PathBuf,
    print_sample: Option<usize>,
    quiet: bool,
) -> Result<(), CliError> {
    let creds = SteamCredentials::load().map_err(|e| CliError::config(e.to_string()))?;
    let client = SteamClient::new(creds.api_key.as_str())
        .map_err(|e| CliError::steam(e.to_string()))?;

    let steam_id = match (account.steamid, account.vanity) {
        (Some(id), _) => id,
        (None, Some(vanity)) => {
            let pb = spinner(quiet, &format!("Resolving vanity name '{vanity}'..."));
            let resolved = client.resolve_vanity(&vanity);
            pb.finish_and_clear();
            resolved.map_err(|e| CliError::steam(e.to_string()))?
        }
        (None, None) => creds.steam_id.ok_or_else(|| {
            CliError::config(
                "No account given. Pass --vanity or --steamid, or set STEAM_ID / [steam] steam_id",
            )
        })?,
    };

    let pb = spinner(quiet, &format!("Fetching owned games for {steam_id}..."));
    let owned = client.owned_games(&steam_id);
    pb.finish_and_clear();
    let owned = owned.map_err(|e| CliError::steam(e.to_string()))?;

    if owned.is_empty() {
        log::warn!("No games returned for {steam_id}. Is the profile's game list public?");
    }

    let fetched_at = timestamp_now();
    let games: Vec<SteamGame> = owned.iter().map(|g| g.to_steam_game(&fetched_at)).collect();

    if let Some(n) = print_sample {
        print_sample_rows(&games, n);
        return Ok(());
    }

    match sqlite {
        Some(db_path) => save_to_db(&games, &db_path, &steam_id, quiet),
        None => {
            let file = std::fs::File::create(&out_csv)?;
            steam_gog_import::write_library_csv(file, &games)
                .map_err(|e| CliError::other(format!("Failed to write {}: {}", out_csv.display(), e)))?;
            log::info!(
                "{} Wrote {} games to {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                games.len(),
                out_csv.display(),
            );
            Ok(())
        }
    }
}

fn save_to_db(
    games: &[SteamGame],
    db_path: &std::path::Path,
    steam_id: &str,
    quiet: bool,
) -> Result<(), CliError> {
    let conn = open_db(db_path)?;
    log::info!(
        "{}",
        format!("Saving {} games to {}", games.len(), db_path.display())
            .if_supports_color(Stdout, |t| t.bold()),
    );
    let progress = import_progress(quiet);
    steam_gog_import::import_steam_library(&conn, games, steam_id, Some(progress.as_ref()))
        .map_err(|e| CliError::database(e.to_string()))?;
    Ok(())
}

fn print_sample_rows(games: &[SteamGame], n: usize) {
    log::info!(
        "{}",
        format!("Total games: {}", games.len()).if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    log::info!("  {:>8}  {:<50}  {:>10}", "appid", "name", "playtime");
    for game in games.iter().take(n) {
        log::info!(
            "  {:>8}  {:<50}  {:>10}",
            game.steam_app_id,
            truncate_str(&game.title, 50),
            format_playtime(game.playtime_forever_min),
        );
    }
}

/// Format minutes as hours with one decimal, e.g. `90` → `"1.5h"`.
fn format_playtime(minutes: i64) -> String {
    format!("{}.{}h", minutes / 60, (minutes % 60) / 6)
}

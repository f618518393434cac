//! Steam Web API response types.

use serde::Deserialize;
use steam_gog_catalog::SteamGame;

use crate::error::SteamError;

/// One entry of `GetOwnedGames`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OwnedGame {
    pub appid: i64,
    /// Present when the request sets `include_appinfo=1`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub playtime_forever: i64,
    #[serde(default)]
    pub playtime_2weeks: i64,
}

impl OwnedGame {
    /// Convert to the stored library row, stamped with `last_updated_utc`.
    pub fn to_steam_game(&self, last_updated_utc: &str) -> SteamGame {
        SteamGame {
            steam_app_id: self.appid,
            title: self.display_name().to_string(),
            playtime_forever_min: self.playtime_forever,
            playtime_2weeks_min: self.playtime_2weeks,
            last_updated_utc: last_updated_utc.to_string(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Debug, Default, Deserialize)]
struct OwnedGamesResponse {
    #[serde(default)]
    games: Vec<OwnedGame>,
}

#[derive(Debug, Deserialize)]
struct ResolveVanityResponse {
    success: i64,
    #[serde(default)]
    steamid: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Parse a `GetOwnedGames` body. A private or empty library has no `games`
/// key and yields an empty list.
pub fn parse_owned_games(body: &str) -> Result<Vec<OwnedGame>, SteamError> {
    let envelope: Envelope<OwnedGamesResponse> = serde_json::from_str(body)
        .map_err(|e| SteamError::response(format!("GetOwnedGames: {e}")))?;
    Ok(envelope.response.games)
}

/// Parse a `ResolveVanityURL` body into a SteamID64.
pub fn parse_vanity_response(vanity: &str, body: &str) -> Result<String, SteamError> {
    let envelope: Envelope<ResolveVanityResponse> = serde_json::from_str(body)
        .map_err(|e| SteamError::response(format!("ResolveVanityURL: {e}")))?;
    let response = envelope.response;
    match (response.success, response.steamid) {
        (1, Some(steamid)) => Ok(steamid),
        (_, _) => Err(SteamError::VanityNotFound {
            vanity: vanity.to_string(),
            message: response
                .message
                .unwrap_or_else(|| format!("success = {}", response.success)),
        }),
    }
}

/// Check that a string looks like a SteamID64 (decimal digits only).
pub fn validate_steam_id(steam_id: &str) -> Result<&str, SteamError> {
    let trimmed = steam_id.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SteamError::InvalidSteamId(steam_id.to_string()));
    }
    Ok(trimmed)
}

use std::time::Duration;

use crate::error::SteamError;
use crate::types::{OwnedGame, parse_owned_games, parse_vanity_response, validate_steam_id};

const BASE_URL: &str = "https://api.steampowered.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the Steam Web API.
pub struct SteamClient {
    http: reqwest::blocking::Client,
    api_key: String,
}

impl SteamClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SteamError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
        })
    }

    /// Resolve a vanity name (the `id/<name>` part of a profile URL) to a SteamID64.
    pub fn resolve_vanity(&self, vanity: &str) -> Result<String, SteamError> {
        let body = self.get(
            "ISteamUser/ResolveVanityURL/v0001/",
            &[("vanityurl", vanity)],
        )?;
        let steam_id = parse_vanity_response(vanity, &body)?;
        log::debug!("Resolved vanity '{vanity}' to {steam_id}");
        Ok(steam_id)
    }

    /// List all games owned by a SteamID64, including names.
    pub fn owned_games(&self, steam_id: &str) -> Result<Vec<OwnedGame>, SteamError> {
        let steam_id = validate_steam_id(steam_id)?;
        let body = self.get(
            "IPlayerService/GetOwnedGames/v0001/",
            &[
                ("steamid", steam_id),
                ("include_appinfo", "1"),
                ("include_played_free_games", "1"),
            ],
        )?;
        let games = parse_owned_games(&body)?;
        log::debug!("Steam returned {} owned games for {steam_id}", games.len());
        Ok(games)
    }

    fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, SteamError> {
        let url = format!("{BASE_URL}/{endpoint}");
        let resp = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("format", "json")])
            .query(params)
            .send()
            // The request URL carries the API key.
            .map_err(|e| SteamError::Http(e.without_url()))?;

        let status = resp.status();
        let text = resp.text().map_err(|e| SteamError::Http(e.without_url()))?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SteamError::Api {
                status: status.as_u16(),
                message: "API key rejected or profile not visible".to_string(),
            });
        }
        if !status.is_success() {
            return Err(SteamError::Api {
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }
        Ok(text)
    }
}

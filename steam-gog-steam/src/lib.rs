//! Steam Web API access: resolving vanity names and listing owned games.

pub mod client;
pub mod credentials;
pub mod error;
pub mod types;

pub use client::SteamClient;
pub use credentials::{CredentialSource, SteamCredentials, api_key_source, config_path};
pub use error::SteamError;
pub use types::{OwnedGame, validate_steam_id};

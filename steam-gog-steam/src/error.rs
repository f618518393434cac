/// Errors that can occur while talking to the Steam Web API.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Steam API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not resolve vanity '{vanity}': {message}")]
    VanityNotFound { vanity: String, message: String },

    #[error("Invalid SteamID64 '{0}'")]
    InvalidSteamId(String),

    #[error("Unexpected Steam response: {0}")]
    Response(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SteamError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn response(msg: impl Into<String>) -> Self {
        Self::Response(msg.into())
    }
}

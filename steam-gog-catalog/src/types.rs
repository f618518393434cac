//! Data model types for the Steam → GOG catalog.
//!
//! These types mirror the persistent schema: the imported Steam library,
//! GOGDB products and their price history, and the per-game match results.

use std::fmt;
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Steam ───────────────────────────────────────────────────────────────────

/// A game owned in the user's Steam library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteamGame {
    pub steam_app_id: i64,
    pub title: String,
    /// Total playtime in minutes.
    #[serde(default)]
    pub playtime_forever_min: i64,
    /// Playtime over the last two weeks in minutes.
    #[serde(default)]
    pub playtime_2weeks_min: i64,
    #[serde(default)]
    pub last_updated_utc: String,
}

// ── GOG ─────────────────────────────────────────────────────────────────────

/// A product from the GOGDB dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GogProduct {
    pub gog_product_id: i64,
    pub title: String,
    /// Cached output of [`crate::normalize`] for `title`.
    pub normalized_title: String,
    /// GOGDB product type: "game", "dlc", "pack", ...
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl GogProduct {
    /// Build a product, deriving the normalized title.
    pub fn new(gog_product_id: i64, title: impl Into<String>) -> Self {
        let title = title.into();
        let normalized_title = crate::normalize(&title);
        Self {
            gog_product_id,
            title,
            normalized_title,
            product_type: None,
            slug: None,
        }
    }

    pub fn with_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Whether this product takes part in title matching.
    ///
    /// Products without a type are treated as games.
    pub fn is_game(&self) -> bool {
        self.product_type
            .as_deref()
            .is_none_or(|t| t.eq_ignore_ascii_case("game"))
    }
}

/// One observed price for a product in a country and currency.
///
/// Amounts are integer minor units (cents); conversion to a display value
/// happens only when reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GogPrice {
    pub gog_product_id: i64,
    pub country: String,
    pub currency: String,
    pub base_price_minor_units: i64,
    pub discounted_price_minor_units: i64,
    /// RFC 3339 timestamp of the observation.
    pub observed_at: String,
}

impl GogPrice {
    /// Discount as a whole percentage of the base price.
    pub fn discount_pct(&self) -> i64 {
        if self.base_price_minor_units <= 0 {
            return 0;
        }
        let saved = self.base_price_minor_units - self.discounted_price_minor_units;
        (saved * 100) / self.base_price_minor_units
    }
}

// ── Matching ────────────────────────────────────────────────────────────────

/// How a Steam game was mapped to a GOG product.
///
/// Variants are ordered by confidence, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    None,
    LikeUnique,
    NormExact,
    Exact,
}

impl MatchMethod {
    pub const ALL: [MatchMethod; 4] = [
        MatchMethod::Exact,
        MatchMethod::NormExact,
        MatchMethod::LikeUnique,
        MatchMethod::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::NormExact => "norm_exact",
            Self::LikeUnique => "like_unique",
            Self::None => "none",
        }
    }

    /// Confidence score recorded with a result of this method.
    pub fn score(&self) -> f64 {
        match self {
            Self::Exact => 1.0,
            Self::NormExact => 0.85,
            Self::LikeUnique => 0.6,
            Self::None => 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Unknown match method: '{0}'")]
pub struct UnknownMatchMethod(pub String);

impl FromStr for MatchMethod {
    type Err = UnknownMatchMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            "norm_exact" => Ok(Self::NormExact),
            "like_unique" => Ok(Self::LikeUnique),
            "none" => Ok(Self::None),
            other => Err(UnknownMatchMethod(other.to_string())),
        }
    }
}

/// The stored mapping of one Steam game to a GOG product (a `gogdb_games` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub steam_app_id: i64,
    /// `None` when the game is unmatched.
    pub gog_product_id: Option<i64>,
    pub match_method: MatchMethod,
    pub match_score: f64,
}

impl MatchResult {
    pub fn unmatched(steam_app_id: i64) -> Self {
        Self {
            steam_app_id,
            gog_product_id: None,
            match_method: MatchMethod::None,
            match_score: MatchMethod::None.score(),
        }
    }

    pub fn matched(steam_app_id: i64, gog_product_id: i64, method: MatchMethod) -> Self {
        Self {
            steam_app_id,
            gog_product_id: Some(gog_product_id),
            match_method: method,
            match_score: method.score(),
        }
    }
}

// ── Import Tracking ─────────────────────────────────────────────────────────

/// Log entry for a data import or match run.
#[derive(Debug, Clone)]
pub struct ImportLog {
    pub id: i64,
    pub source_type: String,
    pub source_name: String,
    pub imported_at: String,
    pub records_created: i64,
    pub records_updated: i64,
    pub records_unchanged: i64,
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Current UTC time as an RFC 3339 string with second precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format minor units as a two-decimal major amount, e.g. `1999` → `"19.99"`.
pub fn format_major_units(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Format an amount in minor units for display, e.g. `1999, "USD"` → `"19.99 USD"`.
pub fn format_minor_units(amount: i64, currency: &str) -> String {
    format!("{} {currency}", format_major_units(amount))
}

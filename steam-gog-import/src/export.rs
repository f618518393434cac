//! CSV export of the Steam library and reports.
//!
//! Amounts are written in major units with two decimals; stored values stay
//! in minor units.

use std::io::Write;

use steam_gog_catalog::{SteamGame, format_major_units};

use crate::report::CostReport;

/// Write the owned library as `appid,name,playtime_min`.
pub fn write_library_csv<W: Write>(writer: W, games: &[SteamGame]) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["appid", "name", "playtime_min"])?;
    for game in games {
        csv.write_record([
            game.steam_app_id.to_string(),
            game.title.clone(),
            game.playtime_forever_min.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the cost report, one row per matched game.
pub fn write_cost_report_csv<W: Write>(writer: W, report: &CostReport) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "steam_app_id",
        "steam_title",
        "gog_product_id",
        "gog_title",
        "match_method",
        "currency",
        "base_price",
        "discounted_price",
        "observed_at",
    ])?;
    for row in &report.rows {
        let (base, discounted, observed_at) = match &row.price {
            Some(price) => (
                format_major_units(price.base_price_minor_units),
                format_major_units(price.discounted_price_minor_units),
                price.observed_at.clone(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        csv.write_record([
            row.steam_app_id.to_string(),
            row.steam_title.clone(),
            row.gog_product_id.to_string(),
            row.gog_title.clone(),
            row.match_method.to_string(),
            report.currency.clone(),
            base,
            discounted,
            observed_at,
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write unmatched games as `appid,name,playtime_min`.
pub fn write_unmatched_csv<W: Write>(writer: W, games: &[SteamGame]) -> Result<(), csv::Error> {
    write_library_csv(writer, games)
}

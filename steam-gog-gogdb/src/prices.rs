//! `prices.json` parsing.
//!
//! GOGDB stores price history as
//! `{country: {currency: [{date, price_base, price_final}, ...]}}`.
//! Integer amounts are already in minor units; decimal amounts are in major
//! units and are converted, exactly for strings and rounded for floats.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;
use steam_gog_catalog::GogPrice;

/// Prices read from one `prices.json`.
#[derive(Debug, Default, Clone)]
pub struct PriceParse {
    pub prices: Vec<GogPrice>,
    /// Entries that were present but had no usable date or base price.
    pub skipped: usize,
}

/// Parse a product's price history. Never fails: unusable parts are logged
/// and counted in [`PriceParse::skipped`].
pub fn parse_prices(gog_product_id: i64, value: &Value) -> PriceParse {
    let mut out = PriceParse::default();

    let Some(countries) = value.as_object() else {
        log::warn!("Product {gog_product_id}: unrecognized prices.json structure, skipping");
        out.skipped += 1;
        return out;
    };

    for (country, currencies) in countries {
        let Some(currencies) = currencies.as_object() else {
            log::debug!("Product {gog_product_id}: country {country} is not an object");
            out.skipped += 1;
            continue;
        };
        for (currency, history) in currencies {
            let Some(history) = history.as_array() else {
                log::debug!("Product {gog_product_id}: {country}/{currency} history is not a list");
                out.skipped += 1;
                continue;
            };
            for entry in history {
                match parse_entry(gog_product_id, country, currency, entry) {
                    Some(price) => out.prices.push(price),
                    None => out.skipped += 1,
                }
            }
        }
    }

    out
}

fn parse_entry(gog_product_id: i64, country: &str, currency: &str, entry: &Value) -> Option<GogPrice> {
    let observed_at = entry.get("date").and_then(Value::as_str).and_then(normalize_timestamp)?;
    let base = entry.get("price_base").and_then(minor_units)?;
    let discounted = entry.get("price_final").and_then(minor_units).unwrap_or(base);

    Some(GogPrice {
        gog_product_id,
        country: country.to_uppercase(),
        currency: currency.to_uppercase(),
        base_price_minor_units: base,
        discounted_price_minor_units: discounted,
        observed_at,
    })
}

/// Convert a JSON amount to minor units. Negative amounts are rejected.
pub fn minor_units(value: &Value) -> Option<i64> {
    let amount = match value {
        Value::Number(n) => match n.as_i64() {
            Some(minor) => minor,
            None => {
                let major = n.as_f64()?;
                if !major.is_finite() {
                    return None;
                }
                (major * 100.0).round() as i64
            }
        },
        Value::String(s) => decimal_to_minor(s.trim())?,
        _ => return None,
    };
    (amount >= 0).then_some(amount)
}

/// Exact decimal conversion of a major-unit string: `"19.99"` → `1999`.
///
/// Digits past the second decimal place must be zeros.
fn decimal_to_minor(s: &str) -> Option<i64> {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (cents, rest) = frac.split_at(frac.len().min(2));
    if rest.bytes().any(|b| b != b'0') {
        return None;
    }

    let whole: i64 = whole.parse().ok()?;
    let cents: i64 = match cents.len() {
        0 => 0,
        1 => cents.parse::<i64>().ok()? * 10,
        _ => cents.parse().ok()?,
    };
    whole.checked_mul(100)?.checked_add(cents)
}

/// Normalize a GOGDB date to RFC 3339 UTC with second precision.
///
/// Accepts offset timestamps, naive timestamps (taken as UTC) and plain dates.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let utc: DateTime<Utc> = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.with_timezone(&Utc)
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        naive.and_utc()
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        naive.and_utc()
    } else if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0)?.and_utc()
    } else {
        return None;
    };
    Some(utc.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_amounts_are_minor_units() {
        assert_eq!(minor_units(&json!(1999)), Some(1999));
        assert_eq!(minor_units(&json!(0)), Some(0));
    }

    #[test]
    fn decimal_amounts_are_major_units() {
        assert_eq!(minor_units(&json!(19.99)), Some(1999));
        assert_eq!(minor_units(&json!(0.1)), Some(10));
        assert_eq!(minor_units(&json!("19.99")), Some(1999));
        assert_eq!(minor_units(&json!("5.5")), Some(550));
        assert_eq!(minor_units(&json!("20")), Some(2000));
        assert_eq!(minor_units(&json!("4.990")), Some(499));
    }

    #[test]
    fn rejects_unusable_amounts() {
        assert_eq!(minor_units(&json!(-1)), None);
        assert_eq!(minor_units(&json!("-1.00")), None);
        assert_eq!(minor_units(&json!("4.999")), None);
        assert_eq!(minor_units(&json!("free")), None);
        assert_eq!(minor_units(&json!("")), None);
        assert_eq!(minor_units(&json!(null)), None);
    }

    #[test]
    fn timestamps_normalize_to_utc() {
        assert_eq!(
            normalize_timestamp("2024-03-01T12:30:00+02:00").as_deref(),
            Some("2024-03-01T10:30:00Z")
        );
        assert_eq!(
            normalize_timestamp("2024-03-01T12:30:00.123456").as_deref(),
            Some("2024-03-01T12:30:00Z")
        );
        assert_eq!(
            normalize_timestamp("2024-03-01 12:30:00").as_deref(),
            Some("2024-03-01T12:30:00Z")
        );
        assert_eq!(
            normalize_timestamp("2024-03-01").as_deref(),
            Some("2024-03-01T00:00:00Z")
        );
        assert_eq!(normalize_timestamp("yesterday"), None);
    }

    #[test]
    fn parses_price_history() {
        let value = json!({
            "us": {
                "usd": [
                    {"date": "2024-01-01T00:00:00+00:00", "price_base": 3999, "price_final": 3999},
                    {"date": "2024-02-01T00:00:00+00:00", "price_base": 3999, "price_final": 999},
                    {"date": "2024-03-01T00:00:00+00:00", "price_final": 999},
                    {"price_base": 3999}
                ]
            },
            "DE": {"EUR": [{"date": "2024-02-01", "price_base": "34.99"}]},
            "XX": "garbage"
        });

        let parsed = parse_prices(7, &value);
        assert_eq!(parsed.prices.len(), 3);
        assert_eq!(parsed.skipped, 3);

        let de = parsed.prices.iter().find(|p| p.country == "DE").unwrap();
        assert_eq!(de.base_price_minor_units, 3499);
        assert_eq!(de.discounted_price_minor_units, 3499);

        let sale = parsed
            .prices
            .iter()
            .find(|p| p.observed_at == "2024-02-01T00:00:00Z" && p.country == "US")
            .unwrap();
        assert_eq!(sale.currency, "USD");
        assert_eq!(sale.discounted_price_minor_units, 999);
    }

    #[test]
    fn unknown_structure_is_skipped() {
        let parsed = parse_prices(7, &json!([1, 2, 3]));
        assert!(parsed.prices.is_empty());
        assert_eq!(parsed.skipped, 1);
    }
}

//! Repurchase cost report: what the matched part of the Steam library would
//! cost on GOG today.

use rusqlite::Connection;
use steam_gog_db::operations::OperationError;
use steam_gog_db::queries::{self, CostRow};

/// Matched games priced in one country and currency.
#[derive(Debug, Clone)]
pub struct CostReport {
    pub country: String,
    pub currency: String,
    pub rows: Vec<CostRow>,
    /// Sum of base prices over rows that have a price, in minor units.
    pub total_base_minor_units: i64,
    /// Sum of discounted prices over rows that have a price, in minor units.
    pub total_discounted_minor_units: i64,
    /// Matched games with no price observation in this country/currency.
    pub unpriced: usize,
}

impl CostReport {
    pub fn priced(&self) -> usize {
        self.rows.len() - self.unpriced
    }
}

/// Build the cost report using each product's latest observed price.
///
/// Country and currency codes are compared upper-cased, as stored.
pub fn cost_report(
    conn: &Connection,
    country: &str,
    currency: &str,
) -> Result<CostReport, OperationError> {
    let country = country.trim().to_uppercase();
    let currency = currency.trim().to_uppercase();
    let rows = queries::cost_rows(conn, &country, &currency)?;

    let mut report = CostReport {
        country,
        currency,
        rows: Vec::new(),
        total_base_minor_units: 0,
        total_discounted_minor_units: 0,
        unpriced: 0,
    };
    for row in &rows {
        match &row.price {
            Some(price) => {
                report.total_base_minor_units += price.base_price_minor_units;
                report.total_discounted_minor_units += price.discounted_price_minor_units;
            }
            None => report.unpriced += 1,
        }
    }
    report.rows = rows;
    Ok(report)
}

//! Dump root discovery and per-product parsing.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use steam_gog_catalog::{GogPrice, GogProduct};

use crate::error::GogdbError;
use crate::prices::parse_prices;

const DUMP_PREFIX: &str = "gogdb_";
const PRODUCTS_DIR: &str = "products";
const PRODUCT_FILE: &str = "product.json";
const PRICES_FILE: &str = "prices.json";

/// Parse the date out of a dump root name such as `gogdb_2024-03-01`.
pub fn dump_date(name: &str) -> Option<NaiveDate> {
    let date = name.strip_prefix(DUMP_PREFIX)?;
    if date.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// A dump root is valid when `products/` holds at least one `<dir>/product.json`.
pub fn is_valid_dump_root(root: &Path) -> bool {
    let Ok(entries) = fs::read_dir(root.join(PRODUCTS_DIR)) else {
        return false;
    };
    entries
        .flatten()
        .any(|entry| entry.path().join(PRODUCT_FILE).is_file())
}

/// Find the newest valid dump root directly under `base_dir`.
///
/// Roots are ordered by the date in their name; invalid or incomplete roots
/// (for example an interrupted unpack) are skipped.
pub fn find_valid_dump_root(base_dir: &Path) -> Result<Option<PathBuf>, GogdbError> {
    let mut candidates: Vec<(NaiveDate, PathBuf)> = Vec::new();
    for entry in fs::read_dir(base_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(date) = entry.file_name().to_str().and_then(dump_date) else {
            continue;
        };
        candidates.push((date, path));
    }
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    for (_, root) in candidates {
        if is_valid_dump_root(&root) {
            return Ok(Some(root));
        }
        log::debug!("Skipping incomplete dump root {}", root.display());
    }
    Ok(None)
}

/// List `(product_id, dir)` pairs in a dump, sorted by id.
///
/// Directories whose name is not a numeric id are skipped.
pub fn list_product_dirs(root: &Path) -> Result<Vec<(i64, PathBuf)>, GogdbError> {
    let products_dir = root.join(PRODUCTS_DIR);
    if !products_dir.is_dir() {
        return Err(GogdbError::invalid_dump(format!(
            "{} does not exist",
            products_dir.display()
        )));
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(&products_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().to_str().and_then(|n| n.parse::<i64>().ok()) {
            Some(id) => dirs.push((id, path)),
            None => log::debug!("Skipping non-numeric product dir {}", path.display()),
        }
    }
    dirs.sort_by_key(|(id, _)| *id);
    Ok(dirs)
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    title: Option<String>,
    name: Option<String>,
    #[serde(rename = "type")]
    product_type: Option<String>,
    slug: Option<String>,
}

/// One product read from a dump, with its price observations.
#[derive(Debug, Clone)]
pub struct DumpProduct {
    pub product: GogProduct,
    pub prices: Vec<GogPrice>,
    /// Price entries that were present but unusable.
    pub skipped_prices: usize,
}

/// Read one product directory.
///
/// Returns `Ok(None)` when the directory has no `product.json` or the product
/// has no usable title. An unreadable `prices.json` is logged and counted as
/// one skipped price; only a malformed `product.json` is an error.
pub fn read_product(id: i64, dir: &Path) -> Result<Option<DumpProduct>, GogdbError> {
    let product_path = dir.join(PRODUCT_FILE);
    if !product_path.is_file() {
        return Ok(None);
    }

    let text = fs::read_to_string(&product_path)?;
    let raw: RawProduct =
        serde_json::from_str(&text).map_err(|e| GogdbError::json(&product_path, e))?;

    let title = raw
        .title
        .or(raw.name)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let Some(title) = title else {
        log::warn!("Product {id} has no title, skipping");
        return Ok(None);
    };

    let mut product = GogProduct::new(id, title);
    product.product_type = raw.product_type.filter(|t| !t.is_empty());
    product.slug = raw.slug.filter(|s| !s.is_empty());

    let prices_path = dir.join(PRICES_FILE);
    let (prices, skipped_prices) = if prices_path.is_file() {
        let text = fs::read_to_string(&prices_path)?;
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => {
                let parsed = parse_prices(id, &value);
                (parsed.prices, parsed.skipped)
            }
            // The product stays matchable without its price history.
            Err(e) => {
                log::warn!("Ignoring unreadable {}: {e}", prices_path.display());
                (Vec::new(), 1)
            }
        }
    } else {
        (Vec::new(), 0)
    };

    Ok(Some(DumpProduct {
        product,
        prices,
        skipped_prices,
    }))
}

//! Title index for GOG product lookups.
//!
//! Builds an in-memory index from GOG products, keyed by the lowercased raw
//! title (exact tier) and by the normalized title (normalized and substring
//! tiers). Every key maps to the full set of product ids sharing it, so
//! duplicate titles surface as ambiguity instead of being silently dropped.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use steam_gog_catalog::{GogProduct, normalize};

/// Outcome of a single index lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Exactly one product carries the key.
    Unique(i64),
    /// Several products carry the key (sorted ids).
    Ambiguous(Vec<i64>),
    NotFound,
}

impl Lookup {
    fn from_ids<'a>(ids: impl IntoIterator<Item = &'a i64>) -> Self {
        let ids: Vec<i64> = ids.into_iter().copied().collect();
        match ids.as_slice() {
            [] => Self::NotFound,
            [id] => Self::Unique(*id),
            _ => Self::Ambiguous(ids),
        }
    }
}

/// An index of GOG products, keyed by title for matching.
#[derive(Debug, Default)]
pub struct TitleIndex {
    by_exact: BTreeMap<String, BTreeSet<i64>>,
    by_normalized: BTreeMap<String, BTreeSet<i64>>,
    titles: HashMap<i64, String>,
}

impl TitleIndex {
    /// Build an index from a list of products.
    ///
    /// Normalized keys are recomputed here rather than trusted from the
    /// product's cached value. Products with a blank title are skipped; an
    /// empty list yields an empty index.
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a GogProduct>) -> Self {
        let mut index = Self::default();

        for product in products {
            let exact_key = exact_key(&product.title);
            if exact_key.is_empty() {
                log::debug!("Skipping GOG product {} with blank title", product.gog_product_id);
                continue;
            }

            index
                .by_exact
                .entry(exact_key)
                .or_default()
                .insert(product.gog_product_id);

            let normalized = normalize(&product.title);
            if !normalized.is_empty() {
                index
                    .by_normalized
                    .entry(normalized)
                    .or_default()
                    .insert(product.gog_product_id);
            }

            index
                .titles
                .entry(product.gog_product_id)
                .or_insert_with(|| product.title.clone());
        }

        index
    }

    /// Case-insensitive lookup on the raw title.
    pub fn exact_lookup(&self, raw_title: &str) -> Lookup {
        match self.by_exact.get(&exact_key(raw_title)) {
            Some(ids) => Lookup::from_ids(ids),
            None => Lookup::NotFound,
        }
    }

    /// Lookup on an already-normalized title.
    pub fn normalized_lookup(&self, normalized_title: &str) -> Lookup {
        match self.by_normalized.get(normalized_title) {
            Some(ids) => Lookup::from_ids(ids),
            None => Lookup::NotFound,
        }
    }

    /// Products whose normalized title contains `needle`, scanning the whole
    /// catalog in key order and stopping once `limit` ids are collected.
    pub fn containing(&self, needle: &str, limit: usize) -> Lookup {
        let mut found = BTreeSet::new();
        for (key, ids) in &self.by_normalized {
            if !key.contains(needle) {
                continue;
            }
            found.extend(ids.iter().copied());
            if found.len() >= limit {
                break;
            }
        }
        Lookup::from_ids(&found)
    }

    /// The indexed title for a product id.
    pub fn title_of(&self, gog_product_id: i64) -> Option<&str> {
        self.titles.get(&gog_product_id).map(String::as_str)
    }

    /// Returns the number of indexed products.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Returns the number of distinct normalized keys.
    pub fn normalized_key_count(&self) -> usize {
        self.by_normalized.len()
    }
}

fn exact_key(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<GogProduct> {
        vec![
            GogProduct::new(1, "Half-Life 2"),
            GogProduct::new(2, "The Witcher 3: Wild Hunt"),
            GogProduct::new(3, "The Witcher 3: Wild Hunt - Game of the Year Edition"),
            GogProduct::new(4, "Gothic"),
        ]
    }

    #[test]
    fn test_exact_lookup_case_insensitive() {
        let index = TitleIndex::from_products(&catalog());
        assert_eq!(index.exact_lookup("HALF-LIFE 2"), Lookup::Unique(1));
        assert_eq!(index.exact_lookup("half-life 2"), Lookup::Unique(1));
        assert_eq!(index.exact_lookup("Half Life 2"), Lookup::NotFound);
    }

    #[test]
    fn test_normalized_lookup_groups_editions() {
        let index = TitleIndex::from_products(&catalog());
        assert_eq!(
            index.normalized_lookup("the witcher 3 wild hunt"),
            Lookup::Ambiguous(vec![2, 3])
        );
        assert_eq!(index.normalized_lookup("gothic"), Lookup::Unique(4));
    }

    #[test]
    fn test_duplicate_titles_keep_all_ids() {
        let products = vec![GogProduct::new(10, "DOOM"), GogProduct::new(11, "DOOM")];
        let index = TitleIndex::from_products(&products);
        assert_eq!(index.exact_lookup("doom"), Lookup::Ambiguous(vec![10, 11]));
    }

    #[test]
    fn test_same_product_twice_is_not_ambiguous() {
        let products = vec![GogProduct::new(7, "Gothic"), GogProduct::new(7, "Gothic")];
        let index = TitleIndex::from_products(&products);
        assert_eq!(index.exact_lookup("Gothic"), Lookup::Unique(7));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_containing_stops_at_limit() {
        let index = TitleIndex::from_products(&catalog());
        assert_eq!(index.containing("witcher", 2), Lookup::Ambiguous(vec![2, 3]));
        assert_eq!(index.containing("half life", 2), Lookup::Unique(1));
        assert_eq!(index.containing("portal", 2), Lookup::NotFound);
    }

    #[test]
    fn test_blank_titles_skipped() {
        let products = vec![GogProduct::new(1, "   "), GogProduct::new(2, "™")];
        let index = TitleIndex::from_products(&products);
        assert_eq!(index.len(), 1);
        assert_eq!(index.normalized_key_count(), 0);
        assert_eq!(index.exact_lookup("™"), Lookup::Unique(2));
    }

    #[test]
    fn test_empty_index() {
        let index = TitleIndex::from_products(&Vec::<GogProduct>::new());
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.exact_lookup("anything"), Lookup::NotFound);
        assert_eq!(index.containing("anything", 2), Lookup::NotFound);
    }

    #[test]
    fn test_title_of() {
        let index = TitleIndex::from_products(&catalog());
        assert_eq!(index.title_of(4), Some("Gothic"));
        assert_eq!(index.title_of(99), None);
    }
}

//! Match the Steam library against the indexed GOGDB catalog.
//!
//! The title index is built once per run from the stored products and
//! dropped at the end. Each result is upserted on its own, so an interrupted
//! run keeps every row written before the failure.

use rusqlite::Connection;
use steam_gog_catalog::types::*;
use steam_gog_db::operations::{self, OperationError, UpsertOutcome};
use steam_gog_db::queries;
use steam_gog_matcher::{MatchConfig, TitleIndex, match_title};
use thiserror::Error;

use crate::progress::ImportProgress;

#[derive(Debug, Error)]
pub enum MatchRunError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("No GOGDB games indexed; run `gog index` first")]
    EmptyCatalog,
}

/// Options for a matching run.
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    /// Process at most this many Steam games, most played first.
    pub limit: Option<usize>,
    pub config: MatchConfig,
}

/// Statistics from a matching run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchStats {
    pub processed: u64,
    pub exact: u64,
    pub norm_exact: u64,
    pub like_unique: u64,
    pub unmatched: u64,
    /// Games where some tier saw several candidates.
    pub ambiguous: u64,
    pub created: u64,
    pub updated: u64,
    pub unchanged: u64,
    pub indexed_products: u64,
}

impl MatchStats {
    pub fn matched(&self) -> u64 {
        self.exact + self.norm_exact + self.like_unique
    }

    fn record(&mut self, method: MatchMethod) {
        match method {
            MatchMethod::Exact => self.exact += 1,
            MatchMethod::NormExact => self.norm_exact += 1,
            MatchMethod::LikeUnique => self.like_unique += 1,
            MatchMethod::None => self.unmatched += 1,
        }
    }
}

/// Match stored Steam games against the stored catalog and persist results.
///
/// Refuses to run against an empty catalog, which would otherwise overwrite
/// every stored match with `none`.
pub fn run_matching(
    conn: &Connection,
    options: &MatchOptions,
    progress: Option<&dyn ImportProgress>,
) -> Result<MatchStats, MatchRunError> {
    let products = queries::load_matchable_products(conn)?;
    if products.is_empty() {
        return Err(MatchRunError::EmptyCatalog);
    }
    let index = TitleIndex::from_products(&products);
    drop(products);
    log::debug!(
        "Title index: {} products, {} normalized keys",
        index.len(),
        index.normalized_key_count()
    );

    let games = queries::load_steam_games(conn, options.limit)?;
    let mut stats = MatchStats {
        indexed_products: index.len() as u64,
        ..Default::default()
    };

    if let Some(p) = progress {
        p.on_phase(&format!(
            "Matching {} Steam games against {} GOG games",
            games.len(),
            index.len()
        ));
    }

    let matched_at = timestamp_now();
    for (i, game) in games.iter().enumerate() {
        let outcome = match_title(&game.title, &index, &options.config);
        if outcome.ambiguous {
            stats.ambiguous += 1;
        }
        stats.record(outcome.method);

        if let Some(id) = outcome.gog_product_id {
            log::debug!(
                "{} -> {} [{}] via {}",
                game.title,
                index.title_of(id).unwrap_or("?"),
                id,
                outcome.method
            );
        }

        let result = outcome.into_result(game.steam_app_id);
        match operations::upsert_match_result(conn, &result, &matched_at)? {
            UpsertOutcome::Created => stats.created += 1,
            UpsertOutcome::Updated => stats.updated += 1,
            UpsertOutcome::Unchanged => stats.unchanged += 1,
        }
        stats.processed += 1;

        if let Some(p) = progress {
            p.on_item(i + 1, games.len(), &game.title);
        }
    }

    operations::insert_import_log(
        conn,
        &ImportLog {
            id: 0,
            source_type: "match".to_string(),
            source_name: format!("min_like_length={}", options.config.min_like_length),
            imported_at: matched_at,
            records_created: stats.created as i64,
            records_updated: stats.updated as i64,
            records_unchanged: stats.unchanged as i64,
        },
    )?;

    if let Some(p) = progress {
        p.on_complete(&format!(
            "Matched {}/{} games ({} exact, {} normalized, {} substring)",
            stats.matched(),
            stats.processed,
            stats.exact,
            stats.norm_exact,
            stats.like_unique
        ));
    }

    Ok(stats)
}

use std::fs;
use std::path::{Path, PathBuf};

use steam_gog_catalog::types::*;
use steam_gog_db::*;
use steam_gog_import::*;
use steam_gog_matcher::MatchConfig;

fn write_product(root: &Path, id: i64, product: &str, prices: Option<&str>) {
    let dir = root.join("products").join(id.to_string());
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("product.json"), product).unwrap();
    if let Some(prices) = prices {
        fs::write(dir.join("prices.json"), prices).unwrap();
    }
}

fn sample_dump(base: &Path) -> PathBuf {
    let root = base.join("gogdb_2024-03-01");
    write_product(
        &root,
        1,
        r#"{"title": "Half-Life 2", "type": "game"}"#,
        Some(r#"{"US": {"USD": [{"date": "2024-02-01T00:00:00+00:00", "price_base": 999, "price_final": 199}]}}"#),
    );
    write_product(
        &root,
        2,
        r#"{"title": "The Witcher 3: Wild Hunt", "type": "game", "slug": "the_witcher_3_wild_hunt"}"#,
        Some(r#"{"US": {"USD": [
            {"date": "2024-01-01T00:00:00+00:00", "price_base": 3999, "price_final": 3999},
            {"date": "2024-02-15T00:00:00+00:00", "price_base": 3999, "price_final": 999}
        ]}}"#),
    );
    write_product(&root, 3, r#"{"title": "The Witcher 3 - Soundtrack", "type": "dlc"}"#, None);
    write_product(&root, 4, r#"{"title": "DOOM", "type": "game"}"#, None);
    write_product(&root, 5, r#"{"title": "DOOM", "type": "game"}"#, None);
    write_product(&root, 6, r#"{"title": "DOOM II", "type": "game"}"#, None);
    write_product(&root, 7, r#"{"title": "Observer: System Redux - Day One Edition"}"#, None);
    write_product(&root, 8, "{broken", None);
    root
}

fn steam_library() -> Vec<SteamGame> {
    [
        (220, "Half-Life 2", 912),
        (292030, "The Witcher 3: Wild Hunt™", 4213),
        (379720, "DOOM", 300),
        (1750200, "Observer System Redux", 120),
        (400, "Portal", 60),
    ]
    .into_iter()
    .map(|(id, title, playtime)| SteamGame {
        steam_app_id: id,
        title: title.to_string(),
        playtime_forever_min: playtime,
        playtime_2weeks_min: 0,
        last_updated_utc: "2024-03-01T12:00:00Z".to_string(),
    })
    .collect()
}

fn loaded_db(base: &Path) -> Connection {
    let conn = open_memory().unwrap();
    let root = sample_dump(base);
    import_gogdb_dump(&conn, &root, None).unwrap();
    import_steam_library(&conn, &steam_library(), "76561197960287930", None).unwrap();
    conn
}

fn stored_rows(conn: &Connection) -> Vec<(i64, Option<i64>, String, f64, String)> {
    let mut stmt = conn
        .prepare(
            "SELECT steam_app_id, gog_product_id, match_method, match_score, matched_at
             FROM gogdb_games ORDER BY steam_app_id",
        )
        .unwrap();
    stmt.query_map([], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
    })
    .unwrap()
    .collect::<Result<Vec<_>, _>>()
    .unwrap()
}

#[test]
fn indexes_dump() {
    let base = tempfile::tempdir().unwrap();
    let conn = open_memory().unwrap();
    let root = sample_dump(base.path());

    let stats = import_gogdb_dump(&conn, &root, Some(&SilentProgress)).unwrap();
    assert_eq!(stats.total_products, 8);
    assert_eq!(stats.products_created, 7);
    assert_eq!(stats.products_skipped, 1);
    assert_eq!(stats.prices_inserted, 3);

    let catalog = catalog_stats(&conn).unwrap();
    assert_eq!(catalog.gog_products, 7);
    assert_eq!(catalog.gog_games, 6);

    let logs = list_import_logs(&conn, None).unwrap();
    assert_eq!(logs[0].source_type, "gogdb");
    assert_eq!(logs[0].source_name, "gogdb_2024-03-01");
}

#[test]
fn reindexing_same_dump_changes_nothing() {
    let base = tempfile::tempdir().unwrap();
    let conn = open_memory().unwrap();
    let root = sample_dump(base.path());
    import_gogdb_dump(&conn, &root, None).unwrap();

    let again = import_gogdb_dump(&conn, &root, None).unwrap();
    assert_eq!(again.products_created, 0);
    assert_eq!(again.products_updated, 0);
    assert_eq!(again.products_unchanged, 7);
    assert_eq!(again.prices_inserted, 0);
    assert_eq!(again.prices_existing, 3);
}

#[test]
fn steam_import_reports_changes() {
    let conn = open_memory().unwrap();
    let mut games = steam_library();

    let first = import_steam_library(&conn, &games, "me", None).unwrap();
    assert_eq!(first.created, 5);

    games[0].playtime_forever_min += 30;
    let second = import_steam_library(&conn, &games, "me", None).unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 1);
    assert_eq!(second.unchanged, 4);
}

#[test]
fn matches_library_against_catalog() {
    let base = tempfile::tempdir().unwrap();
    let conn = loaded_db(base.path());

    let stats = run_matching(&conn, &MatchOptions::default(), Some(&SilentProgress)).unwrap();
    assert_eq!(stats.processed, 5);
    assert_eq!(stats.exact, 1);
    assert_eq!(stats.norm_exact, 1);
    assert_eq!(stats.like_unique, 1);
    assert_eq!(stats.unmatched, 2);
    assert_eq!(stats.ambiguous, 1);
    assert_eq!(stats.created, 5);

    let expect = |id: i64, method: MatchMethod, product: Option<i64>| {
        let result = find_match_result(&conn, id).unwrap().unwrap();
        assert_eq!(result.match_method, method, "app {id}");
        assert_eq!(result.gog_product_id, product, "app {id}");
        assert_eq!(result.match_score, method.score());
    };
    expect(220, MatchMethod::Exact, Some(1));
    expect(292030, MatchMethod::NormExact, Some(2));
    expect(379720, MatchMethod::None, None);
    expect(1750200, MatchMethod::LikeUnique, Some(7));
    expect(400, MatchMethod::None, None);
}

#[test]
fn non_game_products_never_match() {
    let base = tempfile::tempdir().unwrap();
    let conn = loaded_db(base.path());
    upsert_steam_game(
        &conn,
        &SteamGame {
            steam_app_id: 999,
            title: "The Witcher 3 - Soundtrack".to_string(),
            playtime_forever_min: 0,
            playtime_2weeks_min: 0,
            last_updated_utc: "2024-03-01T12:00:00Z".to_string(),
        },
    )
    .unwrap();

    run_matching(&conn, &MatchOptions::default(), None).unwrap();
    let result = find_match_result(&conn, 999).unwrap().unwrap();
    assert_ne!(result.gog_product_id, Some(3));
}

#[test]
fn rerun_leaves_stored_rows_identical() {
    let base = tempfile::tempdir().unwrap();
    let conn = loaded_db(base.path());

    run_matching(&conn, &MatchOptions::default(), None).unwrap();
    let before = stored_rows(&conn);

    let again = run_matching(&conn, &MatchOptions::default(), None).unwrap();
    assert_eq!(again.created, 0);
    assert_eq!(again.updated, 0);
    assert_eq!(again.unchanged, 5);
    assert_eq!(stored_rows(&conn), before);
}

#[test]
fn limit_processes_most_played_first() {
    let base = tempfile::tempdir().unwrap();
    let conn = loaded_db(base.path());

    let options = MatchOptions {
        limit: Some(2),
        config: MatchConfig::default(),
    };
    let stats = run_matching(&conn, &options, None).unwrap();
    assert_eq!(stats.processed, 2);

    let ids: Vec<i64> = list_match_results(&conn)
        .unwrap()
        .iter()
        .map(|r| r.steam_app_id)
        .collect();
    assert_eq!(ids, vec![220, 292030]);

    let summary = match_summary(&conn).unwrap();
    assert_eq!(summary.pending, 3);
}

#[test]
fn min_like_length_is_configurable() {
    let base = tempfile::tempdir().unwrap();
    let conn = loaded_db(base.path());

    let strict = MatchOptions {
        limit: None,
        config: MatchConfig {
            min_like_length: 100,
        },
    };
    let stats = run_matching(&conn, &strict, None).unwrap();
    assert_eq!(stats.like_unique, 0);
    assert_eq!(
        find_match_result(&conn, 1750200).unwrap().unwrap().match_method,
        MatchMethod::None
    );
}

#[test]
fn empty_catalog_is_refused() {
    let conn = open_memory().unwrap();
    import_steam_library(&conn, &steam_library(), "me", None).unwrap();

    let err = run_matching(&conn, &MatchOptions::default(), None).unwrap_err();
    assert!(matches!(err, MatchRunError::EmptyCatalog));
    assert!(list_match_results(&conn).unwrap().is_empty());
}

#[test]
fn unreadable_prices_still_index_the_product() {
    let base = tempfile::tempdir().unwrap();
    let root = base.path().join("gogdb_2024-03-01");
    write_product(
        &root,
        1,
        r#"{"title": "Half-Life 2", "type": "game"}"#,
        Some("{truncated"),
    );

    let conn = open_memory().unwrap();
    let stats = import_gogdb_dump(&conn, &root, None).unwrap();
    assert_eq!(stats.products_created, 1);
    assert_eq!(stats.products_skipped, 0);
    assert_eq!(stats.prices_skipped, 1);

    import_steam_library(&conn, &steam_library(), "me", None).unwrap();
    let stats = run_matching(&conn, &MatchOptions::default(), None).unwrap();
    assert_eq!(stats.exact, 1);
    let result = find_match_result(&conn, 220).unwrap().unwrap();
    assert_eq!(result.gog_product_id, Some(1));
    assert_eq!(result.match_method, MatchMethod::Exact);
}

#[test]
fn cost_report_uses_latest_prices() {
    let base = tempfile::tempdir().unwrap();
    let conn = loaded_db(base.path());
    run_matching(&conn, &MatchOptions::default(), None).unwrap();

    let report = cost_report(&conn, "us", "usd").unwrap();
    assert_eq!(report.rows.len(), 3);
    assert_eq!(report.priced(), 2);
    assert_eq!(report.unpriced, 1);
    assert_eq!(report.total_base_minor_units, 999 + 3999);
    assert_eq!(report.total_discounted_minor_units, 199 + 999);

    let mut out = Vec::new();
    write_cost_report_csv(&mut out, &report).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("292030,The Witcher 3: Wild Hunt™,2,The Witcher 3: Wild Hunt,norm_exact,USD,39.99,9.99,2024-02-15T00:00:00Z"));
}

#[test]
fn unmatched_report_lists_none_results() {
    let base = tempfile::tempdir().unwrap();
    let conn = loaded_db(base.path());
    run_matching(&conn, &MatchOptions::default(), None).unwrap();

    let games = unmatched_games(&conn).unwrap();
    let titles: Vec<&str> = games.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["DOOM", "Portal"]);
}

use steam_gog_catalog::types::*;
use steam_gog_db::*;

fn game(id: i64, title: &str, playtime: i64) -> SteamGame {
    SteamGame {
        steam_app_id: id,
        title: title.to_string(),
        playtime_forever_min: playtime,
        playtime_2weeks_min: 0,
        last_updated_utc: "2024-03-01T12:00:00Z".to_string(),
    }
}

fn price(id: i64, country: &str, currency: &str, observed_at: &str, base: i64) -> GogPrice {
    GogPrice {
        gog_product_id: id,
        country: country.to_string(),
        currency: currency.to_string(),
        base_price_minor_units: base,
        discounted_price_minor_units: base,
        observed_at: observed_at.to_string(),
    }
}

fn setup_db() -> Connection {
    let conn = open_memory().unwrap();

    upsert_steam_game(&conn, &game(220, "Half-Life 2", 900)).unwrap();
    upsert_steam_game(&conn, &game(292030, "The Witcher 3: Wild Hunt", 4200)).unwrap();
    upsert_steam_game(&conn, &game(379720, "DOOM", 300)).unwrap();
    upsert_steam_game(&conn, &game(400, "Portal", 300)).unwrap();

    upsert_gog_product(&conn, &GogProduct::new(1, "Half-Life 2").with_type("game")).unwrap();
    upsert_gog_product(&conn, &GogProduct::new(2, "The Witcher 3: Wild Hunt").with_type("GAME"))
        .unwrap();
    upsert_gog_product(&conn, &GogProduct::new(3, "The Witcher 3 Soundtrack").with_type("dlc"))
        .unwrap();
    upsert_gog_product(&conn, &GogProduct::new(4, "DOOM")).unwrap();

    insert_gog_price(&conn, &price(2, "US", "USD", "2024-01-01T00:00:00Z", 3999)).unwrap();
    insert_gog_price(&conn, &price(2, "US", "USD", "2024-02-01T00:00:00Z", 2999)).unwrap();
    insert_gog_price(&conn, &price(2, "DE", "EUR", "2024-03-01T00:00:00Z", 3499)).unwrap();

    let at = "2024-03-01T12:00:00Z";
    upsert_match_result(&conn, &MatchResult::matched(220, 1, MatchMethod::Exact), at).unwrap();
    upsert_match_result(&conn, &MatchResult::matched(292030, 2, MatchMethod::NormExact), at)
        .unwrap();
    upsert_match_result(&conn, &MatchResult::unmatched(379720), at).unwrap();

    conn
}

#[test]
fn steam_games_ordered_by_playtime() {
    let conn = setup_db();
    let games = load_steam_games(&conn, None).unwrap();
    let ids: Vec<i64> = games.iter().map(|g| g.steam_app_id).collect();
    // Equal playtime falls back to app id order.
    assert_eq!(ids, vec![292030, 220, 400, 379720]);

    let top = load_steam_games(&conn, Some(2)).unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].title, "The Witcher 3: Wild Hunt");
}

#[test]
fn matchable_products_exclude_non_games() {
    let conn = setup_db();
    let products = load_matchable_products(&conn).unwrap();
    let ids: Vec<i64> = products.iter().map(|p| p.gog_product_id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
    assert_eq!(products[1].normalized_title, "the witcher 3 wild hunt");
}

#[test]
fn find_and_list_match_results() {
    let conn = setup_db();

    let found = find_match_result(&conn, 292030).unwrap().unwrap();
    assert_eq!(found.match_method, MatchMethod::NormExact);
    assert_eq!(found.gog_product_id, Some(2));
    assert_eq!(found.match_score, 0.85);

    assert!(find_match_result(&conn, 400).unwrap().is_none());

    let all = list_match_results(&conn).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].steam_app_id, 220);
}

#[test]
fn summary_counts_methods_and_pending() {
    let conn = setup_db();
    let summary = match_summary(&conn).unwrap();
    assert_eq!(
        summary,
        MatchSummary {
            exact: 1,
            norm_exact: 1,
            like_unique: 0,
            unmatched: 1,
            pending: 1,
        }
    );
    assert_eq!(summary.matched(), 2);
}

#[test]
fn unmatched_games_lists_none_results() {
    let conn = setup_db();
    let games = unmatched_games(&conn).unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].title, "DOOM");
}

#[test]
fn latest_price_picks_most_recent_observation() {
    let conn = setup_db();

    let usd = latest_price(&conn, 2, "US", "USD").unwrap().unwrap();
    assert_eq!(usd.base_price_minor_units, 2999);
    assert_eq!(usd.observed_at, "2024-02-01T00:00:00Z");

    assert!(latest_price(&conn, 2, "GB", "GBP").unwrap().is_none());
    assert!(latest_price(&conn, 1, "US", "USD").unwrap().is_none());

    let history = price_history(&conn, 2).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].country, "DE");
}

#[test]
fn cost_rows_join_matches_with_prices() {
    let conn = setup_db();
    let rows = cost_rows(&conn, "US", "USD").unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].steam_app_id, 292030);
    assert_eq!(rows[0].gog_title, "The Witcher 3: Wild Hunt");
    assert_eq!(rows[0].match_method, MatchMethod::NormExact);
    assert_eq!(rows[0].price.as_ref().map(|p| p.base_price_minor_units), Some(2999));

    assert_eq!(rows[1].steam_app_id, 220);
    assert!(rows[1].price.is_none());
}

#[test]
fn catalog_stats_counts_rows() {
    let conn = setup_db();
    let stats = catalog_stats(&conn).unwrap();
    assert_eq!(stats.steam_games, 4);
    assert_eq!(stats.gog_products, 4);
    assert_eq!(stats.gog_games, 3);
    assert_eq!(stats.gog_prices, 3);
    assert_eq!(stats.match_results, 3);
}

#[test]
fn import_logs_newest_first() {
    let conn = setup_db();
    for (i, at) in ["2024-01-01T00:00:00Z", "2024-02-01T00:00:00Z"].iter().enumerate() {
        insert_import_log(
            &conn,
            &ImportLog {
                id: 0,
                source_type: "match".to_string(),
                source_name: format!("run {i}"),
                imported_at: at.to_string(),
                records_created: 0,
                records_updated: 0,
                records_unchanged: 0,
            },
        )
        .unwrap();
    }
    let logs = list_import_logs(&conn, Some(1)).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].source_name, "run 1");
}

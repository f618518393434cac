use std::fs;
use std::path::Path;

use steam_gog_gogdb::*;

fn write_product(root: &Path, id: &str, product: &str, prices: Option<&str>) {
    let dir = root.join("products").join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("product.json"), product).unwrap();
    if let Some(prices) = prices {
        fs::write(dir.join("prices.json"), prices).unwrap();
    }
}

#[test]
fn finds_newest_valid_root() {
    let base = tempfile::tempdir().unwrap();

    let old = base.path().join("gogdb_2024-01-01");
    write_product(&old, "1", r#"{"title": "Old"}"#, None);

    // Newer but incomplete: products/ exists without any product.json.
    fs::create_dir_all(base.path().join("gogdb_2024-03-01/products/5")).unwrap();

    let mid = base.path().join("gogdb_2024-02-01");
    write_product(&mid, "1", r#"{"title": "Mid"}"#, None);

    fs::create_dir_all(base.path().join("not_a_dump/products/1")).unwrap();
    fs::create_dir_all(base.path().join("gogdb_2024-04-01.partial/products")).unwrap();

    let found = find_valid_dump_root(base.path()).unwrap();
    assert_eq!(found.as_deref(), Some(mid.as_path()));
}

#[test]
fn no_valid_root_is_none() {
    let base = tempfile::tempdir().unwrap();
    fs::create_dir_all(base.path().join("gogdb_2024-03-01")).unwrap();
    assert!(find_valid_dump_root(base.path()).unwrap().is_none());
}

#[test]
fn reads_products_and_prices() {
    let base = tempfile::tempdir().unwrap();
    let root = base.path().join("gogdb_2024-03-01");
    write_product(
        &root,
        "1207664663",
        r#"{"id": 1207664663, "title": "The Witcher 3: Wild Hunt", "type": "game", "slug": "the_witcher_3_wild_hunt"}"#,
        Some(r#"{"US": {"USD": [{"date": "2024-02-01T00:00:00+00:00", "price_base": 3999, "price_final": 999}]}}"#),
    );
    write_product(&root, "42", r#"{"name": "Fallback Name", "type": "dlc"}"#, None);
    write_product(&root, "7", r#"{"type": "game"}"#, None);
    fs::create_dir_all(root.join("products/readme")).unwrap();

    let dirs = list_product_dirs(&root).unwrap();
    let ids: Vec<i64> = dirs.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![7, 42, 1207664663]);

    let witcher = read_product(dirs[2].0, &dirs[2].1).unwrap().unwrap();
    assert_eq!(witcher.product.title, "The Witcher 3: Wild Hunt");
    assert_eq!(witcher.product.normalized_title, "the witcher 3 wild hunt");
    assert_eq!(witcher.product.product_type.as_deref(), Some("game"));
    assert_eq!(witcher.prices.len(), 1);
    assert_eq!(witcher.prices[0].base_price_minor_units, 3999);
    assert_eq!(witcher.prices[0].discounted_price_minor_units, 999);
    assert_eq!(witcher.prices[0].observed_at, "2024-02-01T00:00:00Z");

    let dlc = read_product(dirs[1].0, &dirs[1].1).unwrap().unwrap();
    assert_eq!(dlc.product.title, "Fallback Name");
    assert!(!dlc.product.is_game());
    assert!(dlc.prices.is_empty());

    // No title or name at all.
    assert!(read_product(dirs[0].0, &dirs[0].1).unwrap().is_none());
}

#[test]
fn malformed_product_json_is_an_error() {
    let base = tempfile::tempdir().unwrap();
    let root = base.path().join("gogdb_2024-03-01");
    write_product(&root, "1", "{not json", None);

    let dirs = list_product_dirs(&root).unwrap();
    let err = read_product(dirs[0].0, &dirs[0].1).unwrap_err();
    assert!(matches!(err, GogdbError::Json { .. }));
}

#[test]
fn unreadable_prices_keep_the_product() {
    let base = tempfile::tempdir().unwrap();
    let root = base.path().join("gogdb_2024-03-01");
    write_product(
        &root,
        "1",
        r#"{"title": "Half-Life 2", "type": "game"}"#,
        Some("{truncated"),
    );

    let dirs = list_product_dirs(&root).unwrap();
    let entry = read_product(dirs[0].0, &dirs[0].1).unwrap().unwrap();
    assert_eq!(entry.product.title, "Half-Life 2");
    assert!(entry.prices.is_empty());
    assert_eq!(entry.skipped_prices, 1);
}

#[test]
fn missing_products_dir_is_invalid_dump() {
    let base = tempfile::tempdir().unwrap();
    let err = list_product_dirs(base.path()).unwrap_err();
    assert!(matches!(err, GogdbError::InvalidDump(_)));
}

fn build_archive(path: &Path, prefix: &str) {
    let file = fs::File::create(path).unwrap();
    let encoder = xz2::write::XzEncoder::new(file, 6);
    let mut builder = tar::Builder::new(encoder);

    let body = br#"{"title": "Unreal Gold", "type": "game"}"#;
    let mut header = tar::Header::new_gnu();
    header.set_size(body.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(
            &mut header,
            format!("{prefix}products/1207658924/product.json"),
            &body[..],
        )
        .unwrap();

    let encoder = builder.into_inner().unwrap();
    encoder.finish().unwrap();
}

#[test]
fn unpacks_flat_archive() {
    let base = tempfile::tempdir().unwrap();
    let archive = base.path().join("gogdb_2024-03-15.tar.xz");
    build_archive(&archive, "");

    let dest = base.path().join("gogdb_2024-03-15");
    unpack_dump(&archive, &dest, &NoDownloadProgress).unwrap();

    assert!(is_valid_dump_root(&dest));
    assert!(!base.path().join("gogdb_2024-03-15.partial").exists());
    assert_eq!(find_valid_dump_root(base.path()).unwrap(), Some(dest));
}

#[test]
fn unpacks_nested_archive() {
    let base = tempfile::tempdir().unwrap();
    let archive = base.path().join("gogdb_2024-03-15.tar.xz");
    build_archive(&archive, "gogdb_2024-03-15/");

    let dest = base.path().join("gogdb_2024-03-15");
    unpack_dump(&archive, &dest, &NoDownloadProgress).unwrap();

    assert!(dest.join("products/1207658924/product.json").is_file());
}

#[test]
fn corrupt_archive_leaves_no_dump_root() {
    let base = tempfile::tempdir().unwrap();
    let archive = base.path().join("gogdb_2024-03-15.tar.xz");
    fs::write(&archive, b"definitely not xz").unwrap();

    let dest = base.path().join("gogdb_2024-03-15");
    assert!(unpack_dump(&archive, &dest, &NoDownloadProgress).is_err());
    assert!(!dest.exists());
    assert!(find_valid_dump_root(base.path()).unwrap().is_none());
}

use assert_cmd::prelude::*;
use mhdsync_core::store::{ProductRecord, ProductStore, SqliteProductStore};
use mhdsync_core::sync::TextVariant;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn setup(root: &Path) -> (PathBuf, PathBuf) {
    let db = root.join("products.db");
    let store = SqliteProductStore::open(&db).unwrap();
    store
        .insert_product(&ProductRecord {
            id: "a".into(),
            product_number: "SW-a".into(),
            manufacturer_number: None,
            variants: vec![
                TextVariant::new("de", "Milch").with_description("<p>Frisch</p>"),
                TextVariant::new("en", "Milk"),
            ],
        })
        .unwrap();

    let cfg = root.join("config.toml");
    fs::write(
        &cfg,
        format!("version = 1\n[profiles.default]\ndatabase = \"{}\"\n", db.display()),
    )
    .unwrap();
    (cfg, db)
}

fn mhd(cfg: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mhd"));
    cmd.arg("--config").arg(cfg).args(["--today", "2024-12-01"]);
    cmd
}

fn product(db: &Path) -> ProductRecord {
    SqliteProductStore::open(db).unwrap().fetch("a").unwrap().unwrap()
}

#[test]
fn set_token_then_clear() {
    let tmp = tempdir().unwrap();
    let (cfg, db) = setup(tmp.path());

    mhd(&cfg)
        .args(["set-token", "a", "150125"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 2 translation(s) of a"));
    let p = product(&db);
    assert_eq!(p.token(), Some("150125"));
    assert_eq!(p.variants[0].title, "Milch MHD 15.01.25");
    assert!(p.variants[0].description.contains("Mindestens haltbar bis: 15.01.2025"));

    mhd(&cfg)
        .args(["set-token", "a", "150125"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a is already up to date"));

    mhd(&cfg).args(["set-token", "a"]).assert().success();
    let p = product(&db);
    assert_eq!(p.token(), None);
    assert_eq!(p.variants[0].title, "Milch");
    assert_eq!(p.variants[0].description, "<p>Frisch</p>");
}

#[test]
fn set_token_unknown_product_fails() {
    let tmp = tempdir().unwrap();
    let (cfg, _db) = setup(tmp.path());

    mhd(&cfg)
        .args(["set-token", "zzz", "150125"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Product not found: zzz"));
}

#[test]
fn set_ean_validates_and_writes_span() {
    let tmp = tempdir().unwrap();
    let (cfg, db) = setup(tmp.path());

    mhd(&cfg)
        .args(["set-ean", "a", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid EAN '12345'"));

    mhd(&cfg).args(["set-ean", "a", "4006381333931"]).assert().success();
    let p = product(&db);
    assert_eq!(p.variants[1].field_str("custom_product_single_ean"), Some("4006381333931"));
    assert!(p.variants[0].description.contains("Einzel EAN: 4006381333931"));
}

#[test]
fn stock_comment_only_reacts_to_tokens() {
    let tmp = tempdir().unwrap();
    let (cfg, db) = setup(tmp.path());

    mhd(&cfg)
        .args(["stock-comment", "a", "Nachlieferung"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Comment is not an MHD token"));
    assert_eq!(product(&db).token(), None);

    mhd(&cfg).args(["stock-comment", "a", "311224"]).assert().success();
    let p = product(&db);
    assert_eq!(p.token(), Some("311224"));
    assert_eq!(p.variants[1].title, "Milk MHD 31.12.24");
}

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
    for (id, token, title) in [("a", Some("311224"), "Milk"), ("b", None, "Bread")] {
        store
            .insert_product(&ProductRecord {
                id: id.into(),
                product_number: format!("SW-{id}"),
                manufacturer_number: token.map(Into::into),
                variants: vec![TextVariant::new("de", title)],
            })
            .unwrap();
    }

    let cfg = root.join("config.toml");
    fs::write(
        &cfg,
        format!("version = 1\n[profiles.default]\ndatabase = \"{}\"\n", db.display()),
    )
    .unwrap();
    (cfg, db)
}

fn title_of(db: &Path, id: &str) -> String {
    let store = SqliteProductStore::open(db).unwrap();
    store.fetch(id).unwrap().unwrap().variants[0].title.clone()
}

#[test]
fn sync_updates_then_skips() {
    let tmp = tempdir().unwrap();
    let (cfg, db) = setup(tmp.path());

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mhd"));
    cmd.arg("--config").arg(&cfg).args(["--today", "2024-12-01", "sync"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Synchronization complete"))
        .stdout(predicate::str::contains("Products:  2"))
        .stdout(predicate::str::contains("Updated:   1"))
        .stdout(predicate::str::contains("Skipped:   1"))
        .stdout(predicate::str::contains("Errors:    0"));
    assert_eq!(title_of(&db, "a"), "Milk MHD 31.12.24");

    let mut again = Command::new(assert_cmd::cargo::cargo_bin!("mhd"));
    again.arg("--config").arg(&cfg).args(["--today", "2024-12-01", "sync", "--batch-size", "1"]);
    again
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated:   0"))
        .stdout(predicate::str::contains("Skipped:   2"));
}

#[test]
fn sync_dry_run_leaves_database_alone() {
    let tmp = tempdir().unwrap();
    let (cfg, db) = setup(tmp.path());

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mhd"));
    cmd.arg("--config").arg(&cfg).args(["sync", "--dry-run", "--verbose"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[1/2] SW-a"))
        .stdout(predicate::str::contains("Dry run complete"))
        .stdout(predicate::str::contains("Updated:   1"));
    assert_eq!(title_of(&db, "a"), "Milk");
}

#[test]
fn sync_rejects_zero_batch_size() {
    let tmp = tempdir().unwrap();
    let (cfg, _db) = setup(tmp.path());

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mhd"));
    cmd.arg("--config").arg(&cfg).args(["sync", "--batch-size", "0"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("batch size must be greater than zero"));
}

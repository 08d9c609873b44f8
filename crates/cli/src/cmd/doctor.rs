use mhdsync_core::config::{ConfigLoader, default_config_path};
use mhdsync_core::store::{ProductStore, SqliteProductStore};
use std::path::Path;

use crate::logging;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            logging::init(&rc);
            println!("OK   mhd doctor");
            println!("version: {}", mhdsync_core::version());
            println!(
                "path: {}",
                config.map_or_else(
                    || default_config_path().display().to_string(),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            println!("database: {}", rc.database.display());
            println!("sync.batch_size: {}", rc.sync.batch_size);
            println!("logging.level: {}", rc.logging.level);
            if let Some(ref file) = rc.logging.file {
                println!("logging.file: {}", file.display());
            }
            println!("fields.date: {}", rc.fields.date);
            println!("fields.days: {}", rc.fields.days);
            println!("fields.single_ean: {}", rc.fields.single_ean);

            if rc.database.exists() {
                match SqliteProductStore::open(&rc.database).and_then(|s| s.count()) {
                    Ok(n) => println!("products: {n}"),
                    Err(e) => println!("products: unavailable ({e})"),
                }
            } else {
                println!("products: database not created yet");
            }
            tracing::debug!(profile = %rc.active_profile, "doctor finished");
        }
        Err(e) => {
            println!("FAIL mhd doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}

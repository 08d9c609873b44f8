pub mod decode;
pub mod doctor;
pub mod filter;
pub mod migrate;
pub mod product;
pub mod sync;

use std::path::Path;

use chrono::NaiveDate;
use mhdsync_core::config::{ConfigLoader, ResolvedConfig};
use mhdsync_core::store::SqliteProductStore;
use mhdsync_core::token::{Clock, FixedClock, SystemClock};

use crate::logging;

/// Print an error, flush the log file, and exit with `code`.
pub fn fail(code: i32, msg: impl std::fmt::Display) -> ! {
    eprintln!("{msg}");
    logging::shutdown();
    std::process::exit(code);
}

/// Load the configuration and install logging from it.
pub fn load_config(config: Option<&Path>, profile: Option<&str>) -> ResolvedConfig {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => fail(1, format!("Failed to load config: {e}")),
    };
    logging::init(&rc);
    rc
}

pub fn open_store(rc: &ResolvedConfig) -> SqliteProductStore {
    match SqliteProductStore::open(&rc.database) {
        Ok(store) => store,
        Err(e) => fail(1, format!("Failed to open database {}: {e}", rc.database.display())),
    }
}

/// The `--today` override, else the local date.
pub fn clock(today: Option<NaiveDate>) -> FixedClock {
    FixedClock(today.unwrap_or_else(|| SystemClock.today()))
}

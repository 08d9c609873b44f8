use std::path::Path;

use mhdsync_core::batch::{BatchOptions, BatchRunner};
use mhdsync_core::sync::FieldSynchronizer;

use super::sync::{print_stats, progress};
use super::{clock, fail, load_config, open_store};

/// Run the legacy EAN migration over every product.
pub fn run(config: Option<&Path>, profile: Option<&str>, dry_run: bool) {
    let rc = load_config(config, profile);
    let store = open_store(&rc);
    let synchronizer = FieldSynchronizer::new(rc.fields.clone());
    let options = BatchOptions { batch_size: rc.sync.batch_size, dry_run };

    println!(
        "Migrating '{}' into '{}'",
        rc.fields.legacy_ean, rc.fields.single_ean
    );

    let runner = BatchRunner::new(&store, clock(None), &synchronizer, options);
    match runner.run_legacy_ean_migration(Some(progress(false))) {
        Ok(stats) => {
            println!();
            print_stats(if dry_run { "Dry run complete" } else { "Migration complete" }, &stats);
            if stats.errors > 0 {
                fail(1, format!("{} product(s) failed to update", stats.errors));
            }
        }
        Err(e) => fail(1, format!("\nError during migration: {e}")),
    }
}

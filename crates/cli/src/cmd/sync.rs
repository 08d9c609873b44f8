//! Batch synchronization command.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use mhdsync_core::batch::{BatchOptions, BatchRunner, BatchStats, ProgressCallback};
use mhdsync_core::sync::FieldSynchronizer;

use super::{clock, fail, load_config, open_store};
use crate::SyncArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, today: Option<NaiveDate>, args: &SyncArgs) {
    let rc = load_config(config, profile);
    let store = open_store(&rc);
    let synchronizer = FieldSynchronizer::new(rc.fields.clone());
    let options = BatchOptions {
        batch_size: args.batch_size.unwrap_or(rc.sync.batch_size),
        dry_run: args.dry_run,
    };

    println!("Synchronizing products in {}", rc.database.display());

    let runner = BatchRunner::new(&store, clock(today), &synchronizer, options);
    match runner.run(Some(progress(args.verbose))) {
        Ok(stats) => {
            if !args.verbose {
                println!();
            }
            print_stats(if args.dry_run { "Dry run complete" } else { "Synchronization complete" }, &stats);
            if stats.errors > 0 {
                fail(1, format!("{} product(s) failed to update", stats.errors));
            }
        }
        Err(e) => fail(1, format!("\nError during synchronization: {e}")),
    }
}

pub fn progress(verbose: bool) -> ProgressCallback {
    if verbose {
        Box::new(|current, total, number| {
            println!("[{current}/{total}] {number}");
        })
    } else {
        Box::new(|current, total, _number| {
            if current % 50 == 0 || current == total {
                print!("\rProcessing... {current}/{total}");
                std::io::stdout().flush().ok();
            }
        })
    }
}

pub fn print_stats(heading: &str, stats: &BatchStats) {
    println!("{heading}:");
    println!("  Products:  {}", stats.total);
    println!("  Updated:   {}", stats.updated);
    println!("  Skipped:   {}", stats.skipped);
    println!("  Errors:    {}", stats.errors);
    println!("  Duration:  {}ms", stats.duration_ms);
}

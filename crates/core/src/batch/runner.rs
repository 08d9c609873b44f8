//! Walks every product in the store and synchronizes it.

use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::store::{ProductRecord, ProductStore, StoreError};
use crate::sync::{FieldSynchronizer, VariantUpdate};
use crate::token::{self, Clock};

/// Default number of products fetched per page.
pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("batch size must be greater than zero")]
    ZeroBatchSize,
}

/// Progress callback: (products processed, total products, product number).
pub type ProgressCallback = Box<dyn Fn(usize, usize, &str)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub batch_size: usize,
    /// Compute and count, but never write.
    pub dry_run: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { batch_size: DEFAULT_BATCH_SIZE, dry_run: false }
    }
}

/// Counters reported at the end of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStats {
    /// Products visited.
    pub total: usize,
    /// Products written (or that would be written in a dry run).
    pub updated: usize,
    /// Products already up to date.
    pub skipped: usize,
    /// Products whose write failed.
    pub errors: usize,
    pub duration_ms: u64,
}

/// Batch driver over a [`ProductStore`].
///
/// One failing product never aborts the run: the failure is logged, counted,
/// and the next product is processed. Only failing to read a page stops it.
pub struct BatchRunner<'a, S: ProductStore + ?Sized, C: Clock> {
    store: &'a S,
    clock: C,
    synchronizer: &'a FieldSynchronizer,
    options: BatchOptions,
}

impl<'a, S: ProductStore + ?Sized, C: Clock> BatchRunner<'a, S, C> {
    pub fn new(
        store: &'a S,
        clock: C,
        synchronizer: &'a FieldSynchronizer,
        options: BatchOptions,
    ) -> Self {
        Self { store, clock, synchronizer, options }
    }

    /// Synchronize every product's MHD fields from its token.
    pub fn run(&self, progress: Option<ProgressCallback>) -> Result<BatchStats, BatchError> {
        let today = self.clock.today();
        info!(%today, dry_run = self.options.dry_run, "starting MHD synchronization");

        self.run_with(progress, |product| {
            let date = product.token().and_then(token::decode);
            product
                .variants
                .iter()
                .filter_map(|variant| {
                    self.synchronizer.synchronize_date(date, today, variant).update_for(variant)
                })
                .collect()
        })
    }

    /// Copy legacy EAN values into the single-EAN field where it is still empty.
    pub fn run_legacy_ean_migration(
        &self,
        progress: Option<ProgressCallback>,
    ) -> Result<BatchStats, BatchError> {
        info!(dry_run = self.options.dry_run, "starting legacy EAN migration");

        self.run_with(progress, |product| {
            product
                .variants
                .iter()
                .filter_map(|variant| {
                    let migrated = self.synchronizer.migrate_legacy_ean(variant)?;
                    VariantUpdate::between(variant, &migrated)
                })
                .collect()
        })
    }

    fn run_with<F>(
        &self,
        progress: Option<ProgressCallback>,
        compute: F,
    ) -> Result<BatchStats, BatchError>
    where
        F: Fn(&ProductRecord) -> Vec<VariantUpdate>,
    {
        if self.options.batch_size == 0 {
            return Err(BatchError::ZeroBatchSize);
        }

        let start = Instant::now();
        let mut stats = BatchStats::default();
        let expected = self.store.count()?;
        let mut offset = 0;

        loop {
            let page = self.store.fetch_page(offset, self.options.batch_size)?;
            if page.is_empty() {
                break;
            }

            for product in &page {
                stats.total += 1;
                self.process(product, compute(product), &mut stats);
                if let Some(ref cb) = progress {
                    cb(stats.total, expected, &product.product_number);
                }
            }

            offset += page.len();
            if page.len() < self.options.batch_size {
                break;
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            total = stats.total,
            updated = stats.updated,
            skipped = stats.skipped,
            errors = stats.errors,
            "batch finished"
        );
        Ok(stats)
    }

    fn process(&self, product: &ProductRecord, updates: Vec<VariantUpdate>, stats: &mut BatchStats) {
        if updates.is_empty() {
            debug!(product_id = %product.id, "already up to date");
            stats.skipped += 1;
            return;
        }

        if self.options.dry_run {
            info!(product_id = %product.id, variants = updates.len(), "would update (dry run)");
            stats.updated += 1;
            return;
        }

        match self.store.update_variants(&product.id, &updates) {
            Ok(()) => {
                info!(product_id = %product.id, variants = updates.len(), "updated product");
                stats.updated += 1;
            }
            Err(e) => {
                error!(product_id = %product.id, error = %e, "failed to update product");
                stats.errors += 1;
            }
        }
    }
}

//! Reactions to single-product write events.
//!
//! The shop reports writes as [`ProductEvent`]s; [`EventHandler`] loads the
//! product, recomputes the derived fields, and writes back only what changed.

use thiserror::Error;
use tracing::{debug, info};

use crate::store::{ProductRecord, ProductStore, StoreError};
use crate::sync::{EanError, FieldSynchronizer, VariantUpdate};
use crate::token::{self, Clock};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ean(#[from] EanError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductEvent {
    /// The best-before token of a product was written (or cleared).
    ManufacturerNumberWritten { product_id: String, token: Option<String> },
    /// The single-EAN custom field of a product's translations was written.
    SingleEanWritten { product_id: String },
    /// A stock movement was booked with a free-text comment.
    StockMovementCommented { product_id: String, comment: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Translations were written.
    Updated { variants: usize },
    /// Everything was already in sync.
    Unchanged,
    /// The event carried nothing to act on (e.g. a comment that is no token).
    Ignored,
    ProductMissing,
}

pub struct EventHandler<'a, S: ProductStore + ?Sized, C: Clock> {
    store: &'a S,
    clock: C,
    synchronizer: &'a FieldSynchronizer,
}

impl<'a, S: ProductStore + ?Sized, C: Clock> EventHandler<'a, S, C> {
    pub fn new(store: &'a S, clock: C, synchronizer: &'a FieldSynchronizer) -> Self {
        Self { store, clock, synchronizer }
    }

    pub fn handle(&self, event: &ProductEvent) -> Result<HandleOutcome, SyncError> {
        match event {
            ProductEvent::ManufacturerNumberWritten { product_id, token } => {
                self.sync_mhd(product_id, token.as_deref())
            }
            ProductEvent::SingleEanWritten { product_id } => self.refresh_ean(product_id),
            ProductEvent::StockMovementCommented { product_id, comment } => {
                self.apply_stock_comment(product_id, comment)
            }
        }
    }

    /// Store a new token for a product and synchronize its fields.
    pub fn set_token(&self, product_id: &str, token: Option<&str>) -> Result<HandleOutcome, SyncError> {
        if self.store.fetch(product_id)?.is_none() {
            return Ok(HandleOutcome::ProductMissing);
        }
        self.store.set_manufacturer_number(product_id, token)?;
        self.sync_mhd(product_id, token)
    }

    /// Set or clear the single EAN on every translation of a product.
    pub fn set_ean(&self, product_id: &str, ean: Option<&str>) -> Result<HandleOutcome, SyncError> {
        let Some(product) = self.store.fetch(product_id)? else {
            return Ok(HandleOutcome::ProductMissing);
        };
        let mut updates = Vec::new();
        for variant in &product.variants {
            let next = self.synchronizer.synchronize_ean(ean, variant)?;
            updates.extend(VariantUpdate::between(variant, &next));
        }
        self.write(&product, updates)
    }

    fn sync_mhd(&self, product_id: &str, token: Option<&str>) -> Result<HandleOutcome, SyncError> {
        let Some(product) = self.store.fetch(product_id)? else {
            return Ok(HandleOutcome::ProductMissing);
        };
        let today = self.clock.today();
        let updates = product
            .variants
            .iter()
            .filter_map(|v| self.synchronizer.synchronize(token, today, v).update_for(v))
            .collect();
        self.write(&product, updates)
    }

    fn refresh_ean(&self, product_id: &str) -> Result<HandleOutcome, SyncError> {
        let Some(product) = self.store.fetch(product_id)? else {
            return Ok(HandleOutcome::ProductMissing);
        };
        let updates = product
            .variants
            .iter()
            .filter_map(|v| VariantUpdate::between(v, &self.synchronizer.refresh_ean_marker(v)))
            .collect();
        self.write(&product, updates)
    }

    fn apply_stock_comment(&self, product_id: &str, comment: &str) -> Result<HandleOutcome, SyncError> {
        let Some(date) = token::decode(comment) else {
            debug!(product_id, comment, "stock comment is not an MHD token");
            return Ok(HandleOutcome::Ignored);
        };
        let token = comment.trim();
        info!(product_id, token, date = %date.date(), "MHD token from stock movement");
        self.set_token(product_id, Some(token))
    }

    fn write(
        &self,
        product: &ProductRecord,
        updates: Vec<VariantUpdate>,
    ) -> Result<HandleOutcome, SyncError> {
        if updates.is_empty() {
            debug!(product_id = %product.id, "nothing to write");
            return Ok(HandleOutcome::Unchanged);
        }
        self.store.update_variants(&product.id, &updates)?;
        info!(product_id = %product.id, variants = updates.len(), "updated product");
        Ok(HandleOutcome::Updated { variants: updates.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteProductStore;
    use crate::sync::TextVariant;
    use crate::token::FixedClock;
    use chrono::NaiveDate;

    fn setup() -> (SqliteProductStore, FieldSynchronizer) {
        let store = SqliteProductStore::open_in_memory().unwrap();
        store
            .insert_product(&ProductRecord {
                id: "p1".into(),
                product_number: "SW-1".into(),
                manufacturer_number: None,
                variants: vec![
                    TextVariant::new("de", "Milch").with_description("<p>Frisch</p>"),
                    TextVariant::new("en", "Milk"),
                ],
            })
            .unwrap();
        (store, FieldSynchronizer::default())
    }

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap())
    }

    #[test]
    fn test_token_written() {
        let (store, sync) = setup();
        let handler = EventHandler::new(&store, clock(), &sync);
        let event = ProductEvent::ManufacturerNumberWritten {
            product_id: "p1".into(),
            token: Some("311224".into()),
        };
        assert_eq!(handler.handle(&event).unwrap(), HandleOutcome::Updated { variants: 2 });
        assert_eq!(handler.handle(&event).unwrap(), HandleOutcome::Unchanged);

        let product = store.fetch("p1").unwrap().unwrap();
        assert_eq!(product.variants[0].title, "Milch MHD 31.12.24");
        assert_eq!(product.variants[1].title, "Milk MHD 31.12.24");
    }

    #[test]
    fn test_stock_comment() {
        let (store, sync) = setup();
        let handler = EventHandler::new(&store, clock(), &sync);

        let ignored = ProductEvent::StockMovementCommented {
            product_id: "p1".into(),
            comment: "Lieferung vom Montag".into(),
        };
        assert_eq!(handler.handle(&ignored).unwrap(), HandleOutcome::Ignored);

        let dated = ProductEvent::StockMovementCommented {
            product_id: "p1".into(),
            comment: " 150125 ".into(),
        };
        assert_eq!(handler.handle(&dated).unwrap(), HandleOutcome::Updated { variants: 2 });
        let product = store.fetch("p1").unwrap().unwrap();
        assert_eq!(product.token(), Some("150125"));
        assert_eq!(product.variants[1].title, "Milk MHD 15.01.25");
    }

    #[test]
    fn test_ean_events() {
        let (store, sync) = setup();
        let handler = EventHandler::new(&store, clock(), &sync);

        assert!(matches!(
            handler.set_ean("p1", Some("12")),
            Err(SyncError::Ean(EanError::InvalidEan(_)))
        ));
        assert_eq!(
            handler.set_ean("p1", Some("40063813")).unwrap(),
            HandleOutcome::Updated { variants: 2 }
        );
        let event = ProductEvent::SingleEanWritten { product_id: "p1".into() };
        assert_eq!(handler.handle(&event).unwrap(), HandleOutcome::Unchanged);

        handler.set_ean("p1", None).unwrap();
        let product = store.fetch("p1").unwrap().unwrap();
        assert_eq!(product.variants[0].description, "<p>Frisch</p>");
    }

    #[test]
    fn test_missing_product() {
        let (store, sync) = setup();
        let handler = EventHandler::new(&store, clock(), &sync);
        let event = ProductEvent::SingleEanWritten { product_id: "nope".into() };
        assert_eq!(handler.handle(&event).unwrap(), HandleOutcome::ProductMissing);
        assert_eq!(handler.set_token("nope", Some("311224")).unwrap(), HandleOutcome::ProductMissing);
    }
}

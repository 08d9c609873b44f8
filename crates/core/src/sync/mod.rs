//! Field synchronization for one product translation.
//!
//! [`FieldSynchronizer::synchronize`] turns a best-before token into the
//! full set of derived values (title suffix, description span, structured
//! date and days-remaining custom fields). The EAN helpers manage the
//! single-item barcode the same way.

pub mod ean;
pub mod synchronizer;
pub mod types;

pub use ean::{EanError, validate_ean};
pub use synchronizer::FieldSynchronizer;
pub use types::{CustomFields, FieldNames, SynchronizationResult, TextVariant, VariantUpdate};

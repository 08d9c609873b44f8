//! Product persistence.
//!
//! [`ProductStore`] is the record source and sink the batch runner and the
//! event handler work against; [`SqliteProductStore`] implements it on a
//! local SQLite database.
//!
//! # Example
//!
//! ```no_run
//! use mhdsync_core::store::{ProductStore, SqliteProductStore};
//! use std::path::Path;
//!
//! let store = SqliteProductStore::open(Path::new("products.db")).unwrap();
//! for product in store.fetch_page(0, 100).unwrap() {
//!     println!("{} {:?}", product.product_number, product.manufacturer_number);
//! }
//! ```

pub mod repository;
pub mod schema;
pub mod sqlite;

pub use repository::{ProductRecord, ProductStore, StoreError};
pub use schema::{SCHEMA_VERSION, SchemaError};
pub use sqlite::SqliteProductStore;

//! Record source/sink seen by the synchronization callers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schema::SchemaError;
use crate::sync::{TextVariant, VariantUpdate};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Translation '{language}' of product {product} not found")]
    TranslationNotFound { product: String, language: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// A product with its best-before token and all translations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub product_number: String,
    /// Raw `DDMMYY` token as entered by the shop staff.
    pub manufacturer_number: Option<String>,
    #[serde(default)]
    pub variants: Vec<TextVariant>,
}

impl ProductRecord {
    pub fn token(&self) -> Option<&str> {
        self.manufacturer_number.as_deref()
    }
}

/// Storage the synchronizers read products from and write updates to.
pub trait ProductStore {
    /// Number of products.
    fn count(&self) -> Result<usize, StoreError>;

    /// Products ordered by id.
    fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<ProductRecord>, StoreError>;

    fn fetch(&self, id: &str) -> Result<Option<ProductRecord>, StoreError>;

    /// Write changed translation fields of one product atomically.
    fn update_variants(&self, id: &str, updates: &[VariantUpdate]) -> Result<(), StoreError>;

    /// Replace (or clear) a product's best-before token.
    fn set_manufacturer_number(&self, id: &str, token: Option<&str>) -> Result<(), StoreError>;
}

//! SQLite-backed product store.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;

use super::repository::{ProductRecord, ProductStore, StoreError};
use super::schema::init_schema;
use crate::sync::{CustomFields, TextVariant, VariantUpdate};

/// Product database handle.
pub struct SqliteProductStore {
    conn: Connection,
}

impl SqliteProductStore {
    /// Open or create a product database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert a product together with its translations.
    pub fn insert_product(&self, product: &ProductRecord) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO products (id, product_number, manufacturer_number) VALUES (?1, ?2, ?3)",
            params![product.id, product.product_number, product.manufacturer_number],
        )?;
        for variant in &product.variants {
            tx.execute(
                "INSERT INTO product_translations
                    (product_id, language_id, name, description, custom_fields_json)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    product.id,
                    variant.language_id,
                    variant.title,
                    variant.description,
                    fields_to_json(&variant.custom_fields)?,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn load_variants(&self, product_id: &str) -> Result<Vec<TextVariant>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT language_id, name, description, custom_fields_json
             FROM product_translations WHERE product_id = ?1 ORDER BY language_id",
        )?;
        let rows = stmt.query_map([product_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut variants = Vec::new();
        for row in rows {
            let (language_id, name, description, fields_json) = row?;
            variants.push(TextVariant {
                language_id,
                title: name.unwrap_or_default(),
                description: description.unwrap_or_default(),
                custom_fields: fields_from_json(product_id, fields_json.as_deref())?,
            });
        }
        Ok(variants)
    }

    fn with_variants(
        &self,
        (id, product_number, manufacturer_number): (String, String, Option<String>),
    ) -> Result<ProductRecord, StoreError> {
        let variants = self.load_variants(&id)?;
        Ok(ProductRecord { id, product_number, manufacturer_number, variants })
    }
}

impl ProductStore for SqliteProductStore {
    fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self.conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        usize::try_from(n).map_err(|_| StoreError::InvalidData(format!("negative count {n}")))
    }

    fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<ProductRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, product_number, manufacturer_number
             FROM products ORDER BY id LIMIT ?1 OFFSET ?2",
        )?;
        let heads = stmt
            .query_map(params![limit as i64, offset as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        heads.into_iter().map(|head| self.with_variants(head)).collect()
    }

    fn fetch(&self, id: &str) -> Result<Option<ProductRecord>, StoreError> {
        let head = self
            .conn
            .query_row(
                "SELECT id, product_number, manufacturer_number FROM products WHERE id = ?1",
                [id],
                |row| Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                )),
            )
            .optional()?;

        head.map(|head| self.with_variants(head)).transpose()
    }

    fn update_variants(&self, id: &str, updates: &[VariantUpdate]) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        for update in updates {
            let fields_json =
                update.custom_fields.as_ref().map(fields_to_json).transpose()?;
            let rows = tx.execute(
                "UPDATE product_translations SET
                    name = COALESCE(?1, name),
                    description = COALESCE(?2, description),
                    custom_fields_json = COALESCE(?3, custom_fields_json)
                 WHERE product_id = ?4 AND language_id = ?5",
                params![update.title, update.description, fields_json, id, update.language_id],
            )?;
            if rows == 0 {
                return Err(StoreError::TranslationNotFound {
                    product: id.to_string(),
                    language: update.language_id.clone(),
                });
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn set_manufacturer_number(&self, id: &str, token: Option<&str>) -> Result<(), StoreError> {
        let rows = self.conn.execute(
            "UPDATE products SET manufacturer_number = ?1 WHERE id = ?2",
            params![token, id],
        )?;
        if rows == 0 {
            return Err(StoreError::ProductNotFound(id.to_string()));
        }
        Ok(())
    }
}

fn fields_to_json(fields: &CustomFields) -> Result<String, StoreError> {
    serde_json::to_string(fields).map_err(|e| StoreError::InvalidData(e.to_string()))
}

fn fields_from_json(product_id: &str, json: Option<&str>) -> Result<CustomFields, StoreError> {
    let Some(json) = json.filter(|j| !j.trim().is_empty()) else {
        return Ok(CustomFields::new());
    };
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(CustomFields::new()),
        Ok(other) => Err(StoreError::InvalidData(format!(
            "custom fields of {product_id} are not an object: {other}"
        ))),
        Err(e) => Err(StoreError::InvalidData(format!(
            "custom fields of {product_id}: {e}"
        ))),
    }
}

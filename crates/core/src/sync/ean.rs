//! Single-item EAN: custom field plus the `single-ean` description span.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::synchronizer::FieldSynchronizer;
use super::types::TextVariant;
use crate::marker;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EanError {
    #[error("invalid EAN '{0}': expected 8 or 13 digits")]
    InvalidEan(String),
}

/// EAN-8 or EAN-13 shape. The check digit is not verified.
pub fn validate_ean(ean: &str) -> bool {
    matches!(ean.len(), 8 | 13) && ean.bytes().all(|b| b.is_ascii_digit())
}

impl FieldSynchronizer {
    /// Set (`Some`) or clear (`None`) the single EAN of a variant.
    ///
    /// Writes the custom field and the description span together. An invalid
    /// EAN leaves the variant alone and is reported as an error.
    pub fn synchronize_ean(
        &self,
        ean: Option<&str>,
        variant: &TextVariant,
    ) -> Result<TextVariant, EanError> {
        let ean = ean.map(str::trim).filter(|e| !e.is_empty());
        if let Some(invalid) = ean.filter(|e| !validate_ean(e)) {
            warn!(ean = invalid, language = %variant.language_id, "rejecting invalid EAN");
            return Err(EanError::InvalidEan(invalid.to_string()));
        }

        let mut next = variant.clone();
        match ean {
            Some(ean) => {
                next.custom_fields
                    .insert(self.fields().single_ean.clone(), Value::from(ean));
            }
            None => {
                next.custom_fields.remove(&self.fields().single_ean);
            }
        }
        next.description = marker::update_single_ean(&variant.description, ean);
        Ok(next)
    }

    /// Re-render the description span from the variant's single-EAN field.
    pub fn refresh_ean_marker(&self, variant: &TextVariant) -> TextVariant {
        let ean = variant.field_str(&self.fields().single_ean);
        let mut next = variant.clone();
        next.description = marker::update_single_ean(&variant.description, ean);
        next
    }

    /// Copy the legacy EAN field into the single-EAN field.
    ///
    /// Only applies when the legacy field has a value and the single-EAN field
    /// is still empty; returns `None` otherwise.
    pub fn migrate_legacy_ean(&self, variant: &TextVariant) -> Option<TextVariant> {
        let fields = self.fields();
        if variant.field_str(&fields.single_ean).is_some() {
            return None;
        }
        let legacy = variant.field_str(&fields.legacy_ean)?;

        let mut next = variant.clone();
        next.custom_fields.insert(fields.single_ean.clone(), Value::from(legacy));
        next.description = marker::update_single_ean(&variant.description, Some(legacy));
        Some(next)
    }
}

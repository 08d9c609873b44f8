//! Computes every field derived from a product's best-before token.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use super::types::{CustomFields, FieldNames, SynchronizationResult, TextVariant};
use crate::marker;
use crate::token::{self, MhdDate};

/// Derives title, description, and custom fields from a `DDMMYY` token.
///
/// Stateless apart from the configured field names, so one instance can be
/// shared freely between callers.
#[derive(Debug, Clone, Default)]
pub struct FieldSynchronizer {
    fields: FieldNames,
}

impl FieldSynchronizer {
    pub fn new(fields: FieldNames) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }

    /// Synchronize one variant against a raw token.
    ///
    /// An absent, malformed, or impossible token means "no MHD": the title
    /// suffix, description span, and both date custom fields are removed.
    pub fn synchronize(
        &self,
        token: Option<&str>,
        today: NaiveDate,
        variant: &TextVariant,
    ) -> SynchronizationResult {
        let date = token.and_then(token::decode);
        match (date, token.map(str::trim)) {
            (None, Some(raw)) if !raw.is_empty() => {
                debug!(token = raw, language = %variant.language_id, "token is not a valid MHD date");
            }
            _ => {}
        }
        self.synchronize_date(date, today, variant)
    }

    /// Synchronize one variant against an already decoded date.
    pub fn synchronize_date(
        &self,
        date: Option<MhdDate>,
        today: NaiveDate,
        variant: &TextVariant,
    ) -> SynchronizationResult {
        let mut custom_fields = variant.custom_fields.clone();

        let Some(date) = date else {
            self.clear_date_fields(&mut custom_fields);
            return SynchronizationResult {
                language_id: variant.language_id.clone(),
                structured_date: None,
                days_remaining: None,
                title: marker::remove_from_title(&variant.title),
                description: marker::update_best_before(&variant.description, None),
                custom_fields,
            };
        };

        let days = token::days_until(date, today);
        custom_fields.insert(self.fields.date.clone(), Value::from(token::format_for_storage(date)));
        custom_fields.insert(self.fields.days.clone(), Value::from(days));

        let long_date = token::format_for_description(date);
        SynchronizationResult {
            language_id: variant.language_id.clone(),
            structured_date: Some(date.midnight()),
            days_remaining: Some(days),
            title: marker::update_title(&variant.title, &token::format_for_display(date)),
            description: marker::update_best_before(&variant.description, Some(&long_date)),
            custom_fields,
        }
    }

    fn clear_date_fields(&self, custom_fields: &mut CustomFields) {
        custom_fields.remove(&self.fields.date);
        custom_fields.remove(&self.fields.days);
    }
}

//! Value types exchanged between the synchronizer and its callers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed custom fields of one product translation.
pub type CustomFields = Map<String, Value>;

/// Custom-field keys the synchronizer reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    /// Structured best-before timestamp.
    #[serde(default = "default_date_field")]
    pub date: String,
    /// Cached days-remaining counter, always written together with `date`.
    #[serde(default = "default_days_field")]
    pub days: String,
    #[serde(default = "default_single_ean_field")]
    pub single_ean: String,
    /// Field filled by the shop migration from the previous system.
    #[serde(default = "default_legacy_ean_field")]
    pub legacy_ean: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            date: default_date_field(),
            days: default_days_field(),
            single_ean: default_single_ean_field(),
            legacy_ean: default_legacy_ean_field(),
        }
    }
}

fn default_date_field() -> String {
    "custom_product_mhd_date".to_string()
}

fn default_days_field() -> String {
    "custom_product_mhd_days".to_string()
}

fn default_single_ean_field() -> String {
    "custom_product_single_ean".to_string()
}

fn default_legacy_ean_field() -> String {
    "migration_SW566_product_attr12".to_string()
}

/// One localized (title, description, custom fields) triple of a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextVariant {
    pub language_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub custom_fields: CustomFields,
}

impl TextVariant {
    pub fn new(language_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { language_id: language_id.into(), title: title.into(), ..Default::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }

    /// A non-empty string value of a custom field.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.custom_fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// The changed parts of one variant. Untouched fields are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantUpdate {
    pub language_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<CustomFields>,
}

impl VariantUpdate {
    /// Diff two versions of the same variant; `None` when nothing changed.
    pub fn between(current: &TextVariant, next: &TextVariant) -> Option<Self> {
        Self::diff(current, &next.title, &next.description, &next.custom_fields)
    }

    pub(crate) fn diff(
        current: &TextVariant,
        title: &str,
        description: &str,
        custom_fields: &CustomFields,
    ) -> Option<Self> {
        let update = Self {
            language_id: current.language_id.clone(),
            title: (title != current.title).then(|| title.to_string()),
            description: (description != current.description)
                .then(|| description.to_string()),
            custom_fields: (*custom_fields != current.custom_fields)
                .then(|| custom_fields.clone()),
        };
        (!update.is_empty()).then_some(update)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.custom_fields.is_none()
    }

    /// Apply this update to a variant.
    pub fn apply_to(&self, variant: &mut TextVariant) {
        if let Some(title) = &self.title {
            variant.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            variant.description.clone_from(description);
        }
        if let Some(fields) = &self.custom_fields {
            variant.custom_fields.clone_from(fields);
        }
    }
}

/// Derived values computed for one variant from one token.
#[derive(Debug, Clone, PartialEq)]
pub struct SynchronizationResult {
    pub language_id: String,
    /// Best-before date at midnight, `None` when the token is not a date.
    pub structured_date: Option<NaiveDateTime>,
    /// Days from today until the best-before date; negative once expired.
    pub days_remaining: Option<i64>,
    pub title: String,
    pub description: String,
    pub custom_fields: CustomFields,
}

impl SynchronizationResult {
    pub fn has_date(&self) -> bool {
        self.structured_date.is_some()
    }

    pub fn into_variant(self) -> TextVariant {
        TextVariant {
            language_id: self.language_id,
            title: self.title,
            description: self.description,
            custom_fields: self.custom_fields,
        }
    }

    /// What has to be written to bring `current` up to date.
    pub fn update_for(&self, current: &TextVariant) -> Option<VariantUpdate> {
        VariantUpdate::diff(current, &self.title, &self.description, &self.custom_fields)
    }

    /// True when nothing differs from `current`.
    pub fn is_noop(&self, current: &TextVariant) -> bool {
        self.update_for(current).is_none()
    }
}

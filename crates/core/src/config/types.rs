use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::sync::FieldNames;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub fields: FieldNames,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    /// Path of the product database (`~` and env vars are expanded).
    pub database: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Settings for batch runs.
#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    /// Products fetched per page (default: 100)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { batch_size: default_batch_size() }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub database: PathBuf,
    pub logging: LoggingConfig,
    pub sync: SyncConfig,
    pub fields: FieldNames,
}

//! Runtime configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use cashbook_infra::StorageKeys;

pub const DATA_DIR_ENV: &str = "CASHBOOK_DATA_DIR";
pub const EXPORT_PREFIX_ENV: &str = "CASHBOOK_EXPORT_PREFIX";

/// Where the ledger lives and how exports are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashbookConfig {
    /// Directory holding one file per storage key.
    pub data_dir: PathBuf,

    /// Storage keys of the entry, category and settings records.
    pub keys: StorageKeys,

    /// Prefix of dated export filenames.
    pub export_prefix: String,
}

impl Default for CashbookConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            keys: StorageKeys::default(),
            export_prefix: "cashbook".to_string(),
        }
    }
}

impl CashbookConfig {
    /// Defaults overridden by `CASHBOOK_DATA_DIR` and `CASHBOOK_EXPORT_PREFIX`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = lookup(EXPORT_PREFIX_ENV).filter(|v| !v.trim().is_empty()) {
            config.export_prefix = prefix;
        }
        config
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}

/// `{app_data_dir}/cashbook`, falling back to `./data` when the OS reports none.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .map(|base| base.join("cashbook"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

//! Stable keys of the three persisted records.

use serde::{Deserialize, Serialize};

/// Keys addressing the entries, categories, and settings records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub entries: String,
    pub categories: String,
    pub settings: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            entries: "cashbook.entries".to_string(),
            categories: "cashbook.categories".to_string(),
            settings: "cashbook.settings".to_string(),
        }
    }
}

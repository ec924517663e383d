//! Read-only access to categories and currency settings.
//!
//! Both records are owned by other features; this store never writes them.

use cashbook_ledger::{AccountingCategory, AppSettings};

use crate::codec;
use crate::keys::StorageKeys;
use crate::kv::KeyValueStore;

/// Snapshot of the reference data the ledger reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    pub categories: Vec<AccountingCategory>,
    pub settings: AppSettings,
}

/// Loader for categories and settings.
#[derive(Debug)]
pub struct ReferenceStore<S> {
    kv: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> ReferenceStore<S> {
    pub fn new(kv: S, keys: StorageKeys) -> Self {
        Self { kv, keys }
    }

    /// Categories, or an empty list when the record is missing or unreadable.
    pub fn load_categories(&self) -> Vec<AccountingCategory> {
        let key = &self.keys.categories;
        match self.kv.get(key) {
            Ok(Some(bytes)) => codec::decode_categories(&bytes).unwrap_or_else(|err| {
                tracing::warn!(key = %key, error = %err, "categories are corrupt; using none");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "failed to read categories; using none");
                Vec::new()
            }
        }
    }

    /// Settings, or the defaults when the record is missing or unreadable.
    pub fn load_settings(&self) -> AppSettings {
        let key = &self.keys.settings;
        match self.kv.get(key) {
            Ok(Some(bytes)) => codec::decode_settings(&bytes).unwrap_or_else(|err| {
                tracing::warn!(key = %key, error = %err, "settings are corrupt; using defaults");
                AppSettings::default()
            }),
            Ok(None) => AppSettings::default(),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "failed to read settings; using defaults");
                AppSettings::default()
            }
        }
    }

    pub fn load(&self) -> ReferenceData {
        ReferenceData {
            categories: self.load_categories(),
            settings: self.load_settings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::InMemoryKeyValueStore;
    use cashbook_core::CategoryId;
    use cashbook_ledger::{CategoryKind, CurrencyDisplay};
    use std::sync::Arc;

    #[test]
    fn empty_store_yields_defaults() {
        let store = ReferenceStore::new(InMemoryKeyValueStore::new(), StorageKeys::default());
        assert_eq!(store.load(), ReferenceData::default());
    }

    #[test]
    fn stored_records_are_read_back() {
        let keys = StorageKeys::default();
        let kv = Arc::new(InMemoryKeyValueStore::new());

        let categories = vec![AccountingCategory {
            id: CategoryId::new("1700000000000"),
            name: "Utilities".to_string(),
            kind: CategoryKind::Expense,
        }];
        let settings = AppSettings {
            primary: CurrencyDisplay::new("Egyptian Pound", "E£"),
            secondary: CurrencyDisplay::new("US Dollar", "$"),
        };
        kv.put(&keys.categories, &codec::encode_categories(&categories).unwrap())
            .unwrap();
        kv.put(&keys.settings, &codec::encode_settings(&settings).unwrap())
            .unwrap();

        let data = ReferenceStore::new(kv, keys).load();
        assert_eq!(data.categories, categories);
        assert_eq!(data.settings, settings);
    }

    #[test]
    fn corrupt_records_fall_back() {
        let keys = StorageKeys::default();
        let kv = Arc::new(InMemoryKeyValueStore::new());
        kv.put(&keys.categories, b"[{\"id\":").unwrap();
        kv.put(&keys.settings, b"42").unwrap();

        let data = ReferenceStore::new(kv, keys).load();
        assert!(data.categories.is_empty());
        assert_eq!(data.settings, AppSettings::default());
    }
}

//! Durable load/save of the entry collection.

use std::collections::HashSet;
use std::sync::Arc;

use cashbook_core::Entity;
use cashbook_ledger::CashEntry;

use crate::codec;
use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// Persistence port for the whole entry collection.
///
/// `save` writes the entire collection as one unit and `load` returns exactly
/// what was last saved, in the same order. `load` never fails: missing or
/// unreadable data yields an empty collection.
pub trait EntryStore: Send + Sync {
    fn load(&self) -> Vec<CashEntry>;
    fn save(&self, entries: &[CashEntry]) -> Result<(), StoreError>;
}

impl<S> EntryStore for Arc<S>
where
    S: EntryStore + ?Sized,
{
    fn load(&self) -> Vec<CashEntry> {
        (**self).load()
    }

    fn save(&self, entries: &[CashEntry]) -> Result<(), StoreError> {
        (**self).save(entries)
    }
}

/// [`EntryStore`] keeping the collection as a single blob in a key-value store.
#[derive(Debug)]
pub struct KvEntryStore<S> {
    kv: S,
    key: String,
}

impl<S: KeyValueStore> KvEntryStore<S> {
    pub fn new(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key under which an unreadable collection is copied before the next save
    /// replaces it.
    pub fn backup_key(&self) -> String {
        format!("{}.corrupt", self.key)
    }

    fn preserve_unreadable(&self, bytes: &[u8]) {
        let backup = self.backup_key();
        match self.kv.put(&backup, bytes) {
            Ok(()) => {
                tracing::warn!(key = %self.key, %backup, "kept a copy of the unreadable entries");
            }
            Err(err) => {
                tracing::error!(
                    key = %self.key,
                    %backup,
                    error = %err,
                    "failed to back up unreadable entries"
                );
            }
        }
    }
}

impl<S: KeyValueStore> EntryStore for KvEntryStore<S> {
    fn load(&self) -> Vec<CashEntry> {
        let bytes = match self.kv.get(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no stored entries; starting empty");
                return Vec::new();
            }
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    "failed to read entries; starting empty"
                );
                return Vec::new();
            }
        };

        match codec::decode_entries(&bytes) {
            Ok(entries) => dedupe_ids(entries, &self.key),
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    "stored entries are corrupt; starting empty"
                );
                self.preserve_unreadable(&bytes);
                Vec::new()
            }
        }
    }

    fn save(&self, entries: &[CashEntry]) -> Result<(), StoreError> {
        let bytes = codec::encode_entries(entries)?;
        self.kv.put(&self.key, &bytes)?;
        tracing::debug!(key = %self.key, count = entries.len(), "saved entries");
        Ok(())
    }
}

/// Keep the first occurrence of every id so the uniqueness invariant holds even
/// for hand-edited data.
fn dedupe_ids(entries: Vec<CashEntry>, key: &str) -> Vec<CashEntry> {
    let total = entries.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<CashEntry> = entries
        .into_iter()
        .filter(|e| seen.insert(*e.id()))
        .collect();

    if unique.len() != total {
        tracing::warn!(key, dropped = total - unique.len(), "dropped entries with duplicate ids");
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileKeyValueStore, InMemoryKeyValueStore};
    use cashbook_core::{CategoryId, EntryId};
    use cashbook_ledger::EntryDraft;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const KEY: &str = "cashbook.entries";

    fn sample(statement: &str) -> CashEntry {
        CashEntry::from_draft(
            EntryId::new(),
            EntryDraft::new("2024-05-01", statement)
                .with_notes("memo")
                .with_category(CategoryId::new("office"))
                .with_primary(dec!(12.50), dec!(0))
                .with_secondary(dec!(0), dec!(3.125)),
        )
    }

    #[test]
    fn missing_record_loads_empty() {
        let store = KvEntryStore::new(InMemoryKeyValueStore::new(), KEY);
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_record_loads_empty() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        kv.put(KEY, b"{not json").unwrap();

        let store = KvEntryStore::new(kv.clone(), KEY);
        assert!(store.load().is_empty());
    }

    #[test]
    fn non_uuid_ids_make_the_record_unreadable_but_it_is_kept() {
        let raw = br#"[{"id":"1700000000000","date":"2024-01-01","statement":"legacy"}]"#;
        let kv = Arc::new(InMemoryKeyValueStore::new());
        kv.put(KEY, raw).unwrap();

        let store = KvEntryStore::new(kv.clone(), KEY);
        assert!(store.load().is_empty());
        store.save(&[sample("fresh")]).unwrap();

        assert_eq!(kv.get(&store.backup_key()).unwrap().as_deref(), Some(&raw[..]));
    }

    #[test]
    fn wrong_shape_loads_empty() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        kv.put(KEY, br#"{"entries": 3}"#).unwrap();

        let store = KvEntryStore::new(kv, KEY);
        assert!(store.load().is_empty());
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let first = sample("first");
        let mut second = first.clone();
        second.statement = "shadowed".to_string();

        let kv = Arc::new(InMemoryKeyValueStore::new());
        kv.put(KEY, &codec::encode_entries(&[first.clone(), second]).unwrap())
            .unwrap();

        let store = KvEntryStore::new(kv, KEY);
        assert_eq!(store.load(), vec![first]);
    }

    #[test]
    fn file_backed_round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![sample("newest"), sample("middle"), sample("oldest")];

        let store = KvEntryStore::new(FileKeyValueStore::open(dir.path()).unwrap(), KEY);
        store.save(&entries).unwrap();

        let reopened = KvEntryStore::new(FileKeyValueStore::open(dir.path()).unwrap(), KEY);
        assert_eq!(reopened.load(), entries);
    }

    fn arb_amount() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000, 0u32..4).prop_map(|(n, scale)| Decimal::new(n, scale))
    }

    fn arb_entry() -> impl Strategy<Value = CashEntry> {
        (
            (2000i32..2100, 1u32..13, 1u32..29),
            "\\PC{1,24}",
            prop::option::of("\\PC{0,24}"),
            prop::option::of("[a-z]{1,8}"),
            (arb_amount(), arb_amount(), arb_amount(), arb_amount()),
        )
            .prop_map(|((y, m, d), statement, notes, category, (rp, pp, rs, ps))| {
                let mut draft = EntryDraft::new(format!("{y:04}-{m:02}-{d:02}"), statement)
                    .with_primary(rp, pp)
                    .with_secondary(rs, ps);
                draft.notes = notes;
                draft.category_id = category.map(CategoryId::new);
                CashEntry::from_draft(EntryId::new(), draft)
            })
    }

    proptest! {
        /// Property: load(save(C)) == C, including order.
        #[test]
        fn save_then_load_round_trips(entries in prop::collection::vec(arb_entry(), 0..16)) {
            let store = KvEntryStore::new(InMemoryKeyValueStore::new(), KEY);
            store.save(&entries).unwrap();
            prop_assert_eq!(store.load(), entries);
        }
    }
}

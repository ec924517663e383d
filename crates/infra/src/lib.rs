//! Infrastructure layer: key-value persistence, codecs, and stores.

pub mod codec;
pub mod entry_store;
pub mod error;
pub mod keys;
pub mod kv;
pub mod reference;

pub use entry_store::{EntryStore, KvEntryStore};
pub use error::StoreError;
pub use keys::StorageKeys;
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
pub use reference::{ReferenceData, ReferenceStore};

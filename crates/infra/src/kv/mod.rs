//! Key-value persistence port and its backends.
//!
//! The ledger stores each record as one opaque blob under a stable key; the
//! backend never looks inside the blob.

mod file;
mod in_memory;

use std::sync::Arc;

pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;

use crate::error::StoreError;

/// Blob storage addressed by string keys.
///
/// `put` replaces the whole value for a key as a single unit: a concurrent or
/// subsequent `get` observes either the previous or the new blob, never a mix.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }
}

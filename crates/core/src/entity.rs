//! Identity of ledger records.

use std::fmt::Debug;
use std::hash::Hash;

/// A record whose identity survives edits of every other field.
pub trait Entity {
    type Id: Clone + Eq + Hash + Debug;

    fn id(&self) -> &Self::Id;

    /// Whether `other` is the same record, possibly in a different state.
    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. Balances
/// and drafts are value objects; a `CashEntry` is an entity.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

//! Ledger module: cash entries, filtering, and dual-currency aggregation.
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod aggregate;
pub mod category;
pub mod entry;
pub mod filter;
pub mod settings;

pub use aggregate::{
    CategoryBalance, CategoryKey, CurrencyTotals, LedgerTotals, NetBalance, aggregate,
    balances_by_category, running_balances, totals,
};
pub use category::{AccountingCategory, CategoryKind, UNCATEGORIZED, category_label};
pub use entry::{CashEntry, EntryDraft, MAX_AMOUNT};
pub use filter::{EntryFilter, filter, filter_entries};
pub use settings::{AppSettings, CurrencyDisplay};

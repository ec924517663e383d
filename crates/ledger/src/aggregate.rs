//! Dual-currency reductions over entries.
//!
//! Every reduction is a single linear pass. Amounts are `Decimal`, so sums are
//! exact and independent of input order. No conversion between the primary and
//! secondary currency is ever applied.
//!
//! Validated amounts are bounded by `MAX_AMOUNT`, far below the point where a
//! sum could leave the `Decimal` range. Stored data is not revalidated on load,
//! so sums saturate instead of panicking on out-of-range input.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cashbook_core::{CategoryId, ValueObject};

use crate::category::{AccountingCategory, UNCATEGORIZED};
use crate::entry::CashEntry;

/// Received minus paid, per currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetBalance {
    pub net_primary: Decimal,
    pub net_secondary: Decimal,
}

impl ValueObject for NetBalance {}

impl NetBalance {
    pub fn new(net_primary: Decimal, net_secondary: Decimal) -> Self {
        Self {
            net_primary,
            net_secondary,
        }
    }

    fn add_entry(&mut self, entry: &CashEntry) {
        self.net_primary = self
            .net_primary
            .saturating_add(entry.received_primary.saturating_sub(entry.paid_primary));
        self.net_secondary = self
            .net_secondary
            .saturating_add(entry.received_secondary.saturating_sub(entry.paid_secondary));
    }
}

/// Gross money in and money out for one currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyTotals {
    pub received: Decimal,
    pub paid: Decimal,
}

impl CurrencyTotals {
    pub fn net(&self) -> Decimal {
        self.received.saturating_sub(self.paid)
    }

    fn add(&mut self, received: Decimal, paid: Decimal) {
        self.received = self.received.saturating_add(received);
        self.paid = self.paid.saturating_add(paid);
    }
}

/// Gross totals for both currencies over a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub primary: CurrencyTotals,
    pub secondary: CurrencyTotals,
    pub entries: usize,
}

impl ValueObject for LedgerTotals {}

impl LedgerTotals {
    pub fn net(&self) -> NetBalance {
        NetBalance::new(self.primary.net(), self.secondary.net())
    }
}

/// Gross received/paid sums per currency.
pub fn totals<'a>(entries: impl IntoIterator<Item = &'a CashEntry>) -> LedgerTotals {
    entries
        .into_iter()
        .fold(LedgerTotals::default(), |mut acc, entry| {
            acc.primary.add(entry.received_primary, entry.paid_primary);
            acc.secondary.add(entry.received_secondary, entry.paid_secondary);
            acc.entries += 1;
            acc
        })
}

/// Net balance per currency over `entries`.
pub fn aggregate<'a>(entries: impl IntoIterator<Item = &'a CashEntry>) -> NetBalance {
    totals(entries).net()
}

/// Cumulative net balance at each entry, aligned with the input order.
///
/// Balances accumulate in chronological order: ascending by date, and for equal
/// dates from the end of the (newest-first) slice towards its start, so the
/// entry recorded first is counted first.
pub fn running_balances(entries: &[CashEntry]) -> Vec<NetBalance> {
    let mut order: Vec<usize> = (0..entries.len()).rev().collect();
    order.sort_by(|&a, &b| entries[a].date.cmp(&entries[b].date));

    let mut balances = vec![NetBalance::default(); entries.len()];
    let mut running = NetBalance::default();
    for idx in order {
        running.add_entry(&entries[idx]);
        balances[idx] = running;
    }
    balances
}

/// Grouping key for [`balances_by_category`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    Category(CategoryId),
    /// No category, or a reference to one that no longer exists.
    Uncategorized,
}

/// Net balance of the entries filed under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBalance {
    pub key: CategoryKey,
    pub label: String,
    pub balance: NetBalance,
    pub entries: usize,
}

/// Net balance per category.
///
/// Known categories are reported in `categories` order, followed by the
/// uncategorized bucket. Groups without entries are omitted.
pub fn balances_by_category(
    entries: &[CashEntry],
    categories: &[AccountingCategory],
) -> Vec<CategoryBalance> {
    let mut known: HashMap<&CategoryId, (NetBalance, usize)> =
        categories.iter().map(|c| (&c.id, Default::default())).collect();
    let mut uncategorized = (NetBalance::default(), 0usize);

    for entry in entries {
        let bucket = match entry.category_id.as_ref() {
            Some(id) => known.get_mut(id),
            None => None,
        };
        let (balance, count) = bucket.unwrap_or(&mut uncategorized);
        balance.add_entry(entry);
        *count += 1;
    }

    let mut out: Vec<CategoryBalance> = categories
        .iter()
        .filter_map(|c| {
            let (balance, count) = known.remove(&c.id)?;
            (count > 0).then(|| CategoryBalance {
                key: CategoryKey::Category(c.id.clone()),
                label: c.name.clone(),
                balance,
                entries: count,
            })
        })
        .collect();

    if uncategorized.1 > 0 {
        out.push(CategoryBalance {
            key: CategoryKey::Uncategorized,
            label: UNCATEGORIZED.to_string(),
            balance: uncategorized.0,
            entries: uncategorized.1,
        });
    }

    out
}

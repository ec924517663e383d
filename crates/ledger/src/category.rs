//! Accounting categories (read-only reference data).

use serde::{Deserialize, Serialize};

use cashbook_core::{CategoryId, Entity};

/// Label rendered for entries without a resolvable category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Whether a category groups money in or money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

/// A label attachable to an entry for grouping/reporting.
///
/// Categories are owned by an external collaborator; the ledger only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
}

impl Entity for AccountingCategory {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Display name for `category_id`, falling back to [`UNCATEGORIZED`] when the
/// entry has no category or references one that no longer exists.
pub fn category_label<'a>(
    categories: &'a [AccountingCategory],
    category_id: Option<&CategoryId>,
) -> &'a str {
    category_id
        .and_then(|id| categories.iter().find(|c| &c.id == id))
        .map(|c| c.name.as_str())
        .unwrap_or(UNCATEGORIZED)
}

//! Cash entries and the drafts they are created from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cashbook_core::{CategoryId, DomainError, DomainResult, Entity, EntryId, ValueObject};

/// Storage and comparison format of entry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest amount a single entry field may hold: 10^18.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// One recorded cash movement.
///
/// Amounts are tracked independently for two currencies; each pair models money
/// in (`received_*`) vs. money out (`paid_*`). No conversion is ever applied
/// between the primary and secondary fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashEntry {
    id: EntryId,
    /// ISO-8601 `YYYY-MM-DD`, so string order equals calendar order.
    pub date: String,
    pub statement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// May point at a category that no longer exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub received_primary: Decimal,
    #[serde(default)]
    pub paid_primary: Decimal,
    #[serde(default)]
    pub received_secondary: Decimal,
    #[serde(default)]
    pub paid_secondary: Decimal,
}

impl CashEntry {
    /// Build an entry from a draft under a freshly assigned identifier.
    pub fn from_draft(id: EntryId, draft: EntryDraft) -> Self {
        Self {
            id,
            date: draft.date,
            statement: draft.statement,
            notes: draft.notes,
            category_id: draft.category_id,
            received_primary: draft.received_primary,
            paid_primary: draft.paid_primary,
            received_secondary: draft.received_secondary,
            paid_secondary: draft.paid_secondary,
        }
    }

    pub fn id_typed(&self) -> EntryId {
        self.id
    }

    /// Replace every field except the identifier.
    pub fn apply_draft(&mut self, draft: EntryDraft) {
        let id = self.id;
        *self = Self::from_draft(id, draft);
    }

    /// The editable fields of this entry, e.g. to prefill an edit session.
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            date: self.date.clone(),
            statement: self.statement.clone(),
            notes: self.notes.clone(),
            category_id: self.category_id.clone(),
            received_primary: self.received_primary,
            paid_primary: self.paid_primary,
            received_secondary: self.received_secondary,
            paid_secondary: self.paid_secondary,
        }
    }

    /// Calendar date of the entry, if the stored string is well-formed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_canonical_date(&self.date)
    }
}

impl Entity for CashEntry {
    type Id = EntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The user-supplied fields of an entry (everything but the identifier).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub date: String,
    pub statement: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub received_primary: Decimal,
    #[serde(default)]
    pub paid_primary: Decimal,
    #[serde(default)]
    pub received_secondary: Decimal,
    #[serde(default)]
    pub paid_secondary: Decimal,
}

impl ValueObject for EntryDraft {}

impl EntryDraft {
    pub fn new(date: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            statement: statement.into(),
            ..Self::default()
        }
    }

    /// Empty draft dated `date`.
    pub fn dated(date: NaiveDate) -> Self {
        Self::new(date.format(DATE_FORMAT).to_string(), String::new())
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_primary(mut self, received: Decimal, paid: Decimal) -> Self {
        self.received_primary = received;
        self.paid_primary = paid;
        self
    }

    pub fn with_secondary(mut self, received: Decimal, paid: Decimal) -> Self {
        self.received_secondary = received;
        self.paid_secondary = paid;
        self
    }

    /// Check that the draft may be persisted.
    ///
    /// The statement must be non-blank, the date a canonical `YYYY-MM-DD`
    /// calendar date, and every amount between zero and [`MAX_AMOUNT`].
    pub fn validate(&self) -> DomainResult<()> {
        if self.statement.trim().is_empty() {
            return Err(DomainError::validation("statement cannot be empty"));
        }

        if parse_canonical_date(&self.date).is_none() {
            return Err(DomainError::validation(format!(
                "date must be formatted as YYYY-MM-DD (got {:?})",
                self.date
            )));
        }

        let amounts = [
            ("receivedPrimary", self.received_primary),
            ("paidPrimary", self.paid_primary),
            ("receivedSecondary", self.received_secondary),
            ("paidSecondary", self.paid_secondary),
        ];
        for (field, amount) in amounts {
            if amount < Decimal::ZERO {
                return Err(DomainError::validation(format!(
                    "{field} cannot be negative"
                )));
            }
            if amount > MAX_AMOUNT {
                return Err(DomainError::validation(format!(
                    "{field} cannot exceed {MAX_AMOUNT}"
                )));
            }
        }

        Ok(())
    }
}

/// Parse `value` as a date, accepting only the zero-padded canonical form.
///
/// `2024-1-5` parses as a date but would sort after `2024-10-01`, so it is
/// refused.
fn parse_canonical_date(value: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).ok()?;
    (date.format(DATE_FORMAT).to_string() == value).then_some(date)
}

//! Search and date-range selection over entries.
//!
//! Dates are compared as strings. That is only correct because stored dates
//! are ISO-8601 `YYYY-MM-DD`.

use serde::{Deserialize, Serialize};

use crate::entry::CashEntry;

/// Search text plus inclusive date bounds.
///
/// Empty text and empty/absent bounds do not restrict the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    pub search: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn from_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    pub fn to_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    /// True when the filter selects every entry.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.start_bound().is_none() && self.end_bound().is_none()
    }

    /// Whether `entry` passes the search and date predicate.
    pub fn matches(&self, entry: &CashEntry) -> bool {
        self.compile().matches(entry)
    }

    fn start_bound(&self) -> Option<&str> {
        self.start_date.as_deref().filter(|d| !d.is_empty())
    }

    fn end_bound(&self) -> Option<&str> {
        self.end_date.as_deref().filter(|d| !d.is_empty())
    }

    fn compile(&self) -> CompiledFilter<'_> {
        CompiledFilter {
            needle: (!self.search.is_empty()).then(|| self.search.to_lowercase()),
            start: self.start_bound(),
            end: self.end_bound(),
        }
    }
}

/// Filter with the search text lowercased once up front.
struct CompiledFilter<'a> {
    needle: Option<String>,
    start: Option<&'a str>,
    end: Option<&'a str>,
}

impl CompiledFilter<'_> {
    fn matches(&self, entry: &CashEntry) -> bool {
        self.matches_text(entry) && self.matches_dates(entry)
    }

    fn matches_text(&self, entry: &CashEntry) -> bool {
        let Some(needle) = self.needle.as_deref() else {
            return true;
        };
        entry.statement.to_lowercase().contains(needle)
            || entry
                .notes
                .as_deref()
                .is_some_and(|notes| notes.to_lowercase().contains(needle))
    }

    fn matches_dates(&self, entry: &CashEntry) -> bool {
        let date = entry.date.as_str();
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Entries passing `filter`, in input order.
pub fn filter<'a>(entries: &'a [CashEntry], filter: &EntryFilter) -> Vec<&'a CashEntry> {
    let compiled = filter.compile();
    entries.iter().filter(|e| compiled.matches(e)).collect()
}

/// Positional form of [`filter`]; empty strings mean "unrestricted".
pub fn filter_entries<'a>(
    entries: &'a [CashEntry],
    search: &str,
    start_date: &str,
    end_date: &str,
) -> Vec<&'a CashEntry> {
    let f = EntryFilter {
        search: search.to_string(),
        start_date: Some(start_date.to_string()),
        end_date: Some(end_date.to_string()),
    };
    filter(entries, &f)
}

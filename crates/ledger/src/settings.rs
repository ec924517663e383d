//! Currency display settings (read-only reference data).

use serde::{Deserialize, Serialize};

/// How one tracked currency is labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyDisplay {
    pub name: String,
    pub symbol: String,
}

impl CurrencyDisplay {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

/// Display metadata for the primary and secondary currencies.
///
/// Never mutated by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub primary: CurrencyDisplay,
    pub secondary: CurrencyDisplay,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            primary: CurrencyDisplay::new("US Dollar", "$"),
            secondary: CurrencyDisplay::new("Euro", "€"),
        }
    }
}

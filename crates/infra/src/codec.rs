//! (De)serialization boundary for persisted records.
//!
//! Callers only see typed values; the JSON representation stays in here so a
//! schema version can be introduced without touching the stores.

use serde::Serialize;
use serde::de::DeserializeOwned;

use cashbook_ledger::{AccountingCategory, AppSettings, CashEntry};

use crate::error::StoreError;

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Encode the full entry collection (newest first) as one blob.
pub fn encode_entries(entries: &[CashEntry]) -> Result<Vec<u8>, StoreError> {
    encode(entries)
}

pub fn decode_entries(bytes: &[u8]) -> Result<Vec<CashEntry>, StoreError> {
    decode(bytes)
}

pub fn encode_categories(categories: &[AccountingCategory]) -> Result<Vec<u8>, StoreError> {
    encode(categories)
}

pub fn decode_categories(bytes: &[u8]) -> Result<Vec<AccountingCategory>, StoreError> {
    decode(bytes)
}

pub fn encode_settings(settings: &AppSettings) -> Result<Vec<u8>, StoreError> {
    encode(settings)
}

pub fn decode_settings(bytes: &[u8]) -> Result<AppSettings, StoreError> {
    decode(bytes)
}

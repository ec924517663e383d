//! Controller error model.

use thiserror::Error;

use cashbook_core::DomainError;
use cashbook_infra::StoreError;

use crate::export::ExportError;

/// Why the controller refused or failed an operation.
///
/// Lookups of unknown ids are not errors; those operations report `Ok(false)`.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The draft may not be persisted; nothing was changed.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// An export is in flight; the request was refused, not queued.
    #[error("an export is in progress; try again when it completes")]
    Busy,

    /// The store did not acknowledge the save; the in-memory collection is unchanged.
    #[error("failed to persist entries: {0}")]
    Persistence(#[from] StoreError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

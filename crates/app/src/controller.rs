//! Ledger controller: the single writer of the entry collection.
//!
//! Every mutation runs to completion under one lock and is applied in memory
//! only once the store has acknowledged the save. Export is the only operation
//! that suspends; while it is pending the controller refuses mutations instead
//! of queueing them.

use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;

use cashbook_core::EntryId;
use cashbook_infra::EntryStore;
use cashbook_ledger::{
    self as ledger, AccountingCategory, CashEntry, CategoryBalance, EntryDraft, EntryFilter,
    LedgerTotals, NetBalance,
};

use crate::error::LedgerError;
use crate::export::{ExportAdapter, Notice, export_file_base};
use crate::state::{ComposeSession, ControllerState, DeleteToken};

const DEFAULT_EXPORT_PREFIX: &str = "cashbook";

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<CashEntry>,
    state: ControllerState,
    pending_delete: Option<DeleteToken>,
    delete_serial: u64,
    notices: Vec<Notice>,
}

impl Inner {
    fn ensure_not_exporting(&self) -> Result<(), LedgerError> {
        if self.state.is_exporting() {
            tracing::warn!("request refused: export in progress");
            return Err(LedgerError::Busy);
        }
        Ok(())
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id_typed() == id)
    }

    fn fresh_id(&self) -> EntryId {
        loop {
            let id = EntryId::new();
            if self.position(id).is_none() {
                return id;
            }
        }
    }

    fn open_session(&mut self, session: ComposeSession) {
        if let ControllerState::Composing(prior) = &self.state {
            tracing::debug!(editing = ?prior.editing_id, "discarding open draft");
        }
        self.state = ControllerState::Composing(session);
    }
}

/// Orchestrates entry add/edit/delete over an [`EntryStore`] and triggers
/// exports through an [`ExportAdapter`].
pub struct LedgerController<X> {
    store: Box<dyn EntryStore>,
    exporter: X,
    export_prefix: String,
    inner: Mutex<Inner>,
}

impl<X: ExportAdapter> LedgerController<X> {
    /// Create a controller over the collection currently held by `store`.
    pub fn new(store: impl EntryStore + 'static, exporter: X) -> Self {
        let entries = store.load();
        tracing::info!(count = entries.len(), "ledger loaded");

        Self {
            store: Box::new(store),
            exporter,
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            inner: Mutex::new(Inner {
                entries,
                ..Inner::default()
            }),
        }
    }

    /// Prefix used by [`export_view_dated`](Self::export_view_dated).
    pub fn with_export_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.export_prefix = prefix.into();
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ---------------------------------------------------------------------
    // Compose session
    // ---------------------------------------------------------------------

    /// Open an add form with an empty draft dated today.
    pub fn start_add(&self) -> Result<(), LedgerError> {
        let mut inner = self.lock();
        inner.ensure_not_exporting()?;

        let draft = EntryDraft::dated(Local::now().date_naive());
        inner.open_session(ComposeSession::adding(draft));
        tracing::debug!("composing new entry");
        Ok(())
    }

    /// Open an edit form prefilled from entry `id`.
    ///
    /// Returns `Ok(false)` and leaves the state alone when no such entry exists.
    pub fn start_edit(&self, id: EntryId) -> Result<bool, LedgerError> {
        let mut inner = self.lock();
        inner.ensure_not_exporting()?;

        let Some(idx) = inner.position(id) else {
            tracing::debug!(entry_id = %id, "edit requested for unknown entry");
            return Ok(false);
        };
        let draft = inner.entries[idx].to_draft();
        inner.open_session(ComposeSession::editing(id, draft));
        tracing::debug!(entry_id = %id, "composing edit");
        Ok(true)
    }

    /// Change the open draft. Returns `Ok(false)` when nothing is being composed.
    pub fn update_draft(&self, f: impl FnOnce(&mut EntryDraft)) -> Result<bool, LedgerError> {
        let mut inner = self.lock();
        inner.ensure_not_exporting()?;

        match &mut inner.state {
            ControllerState::Composing(session) => {
                f(&mut session.draft);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Discard the open draft, if any.
    pub fn cancel(&self) -> Result<(), LedgerError> {
        let mut inner = self.lock();
        inner.ensure_not_exporting()?;
        inner.state = ControllerState::Idle;
        Ok(())
    }

    /// Add or edit from the open session.
    ///
    /// Returns the affected id, or `None` when nothing was composed or the
    /// edited entry has disappeared meanwhile.
    pub fn submit(&self) -> Result<Option<EntryId>, LedgerError> {
        let mut inner = self.lock();
        inner.ensure_not_exporting()?;

        let Some(session) = inner.state.session().cloned() else {
            return Ok(None);
        };
        match session.editing_id {
            None => self.add_locked(&mut inner, session.draft).map(Some),
            Some(id) => Ok(self
                .edit_locked(&mut inner, id, session.draft)?
                .then_some(id)),
        }
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Record a new entry at the front of the collection.
    pub fn add(&self, draft: EntryDraft) -> Result<EntryId, LedgerError> {
        let mut inner = self.lock();
        inner.ensure_not_exporting()?;
        self.add_locked(&mut inner, draft)
    }

    /// Replace every field of entry `id` except the id itself.
    ///
    /// Returns `Ok(false)` without touching anything when no such entry exists.
    pub fn edit(&self, id: EntryId, draft: EntryDraft) -> Result<bool, LedgerError> {
        let mut inner = self.lock();
        inner.ensure_not_exporting()?;
        self.edit_locked(&mut inner, id, draft)
    }

    /// First phase of a delete: remember which entry the user wants gone.
    ///
    /// Supersedes any earlier, unconfirmed request.
    pub fn request_delete(&self, id: EntryId) -> Result<DeleteToken, LedgerError> {
        let mut inner = self.lock();
        inner.ensure_not_exporting()?;

        inner.delete_serial += 1;
        let token = DeleteToken::new(id, inner.delete_serial);
        inner.pending_delete = Some(token);
        tracing::debug!(entry_id = %id, "delete awaiting confirmation");
        Ok(token)
    }

    /// Second phase of a delete.
    ///
    /// Returns `Ok(false)` when `token` is not the pending request or the entry
    /// no longer exists.
    pub fn confirm_delete(&self, token: DeleteToken) -> Result<bool, LedgerError> {
        let mut inner = self.lock();
        inner.ensure_not_exporting()?;

        if inner.pending_delete != Some(token) {
            tracing::warn!(entry_id = %token.entry_id(), "stale delete confirmation ignored");
            return Ok(false);
        }
        inner.pending_delete = None;

        let id = token.entry_id();
        let Some(idx) = inner.position(id) else {
            tracing::debug!(entry_id = %id, "delete of unknown entry ignored");
            return Ok(false);
        };

        let removed = inner.entries.remove(idx);
        if let Err(err) = self.store.save(&inner.entries) {
            inner.entries.insert(idx, removed);
            inner.pending_delete = Some(token);
            tracing::error!(entry_id = %id, error = %err, "failed to persist delete");
            return Err(err.into());
        }

        // An open edit of the removed entry has nothing left to edit.
        if inner.state.session().and_then(|s| s.editing_id) == Some(id) {
            inner.state = ControllerState::Idle;
        }
        tracing::info!(entry_id = %id, count = inner.entries.len(), "entry deleted");
        Ok(true)
    }

    /// Drop the pending delete request. Returns whether one was pending.
    pub fn cancel_delete(&self) -> bool {
        self.lock().pending_delete.take().is_some()
    }

    pub fn pending_delete(&self) -> Option<DeleteToken> {
        self.lock().pending_delete
    }

    fn add_locked(&self, inner: &mut Inner, draft: EntryDraft) -> Result<EntryId, LedgerError> {
        if let Err(err) = draft.validate() {
            tracing::warn!(error = %err, "entry rejected");
            return Err(err.into());
        }

        let id = inner.fresh_id();
        inner.entries.insert(0, CashEntry::from_draft(id, draft));
        if let Err(err) = self.store.save(&inner.entries) {
            inner.entries.remove(0);
            tracing::error!(error = %err, "failed to persist new entry");
            return Err(err.into());
        }

        inner.state = ControllerState::Idle;
        tracing::info!(entry_id = %id, count = inner.entries.len(), "entry added");
        Ok(id)
    }

    fn edit_locked(
        &self,
        inner: &mut Inner,
        id: EntryId,
        draft: EntryDraft,
    ) -> Result<bool, LedgerError> {
        let Some(idx) = inner.position(id) else {
            tracing::debug!(entry_id = %id, "edit of unknown entry ignored");
            return Ok(false);
        };
        if let Err(err) = draft.validate() {
            tracing::warn!(entry_id = %id, error = %err, "edit rejected");
            return Err(err.into());
        }

        let previous = inner.entries[idx].clone();
        inner.entries[idx].apply_draft(draft);
        if let Err(err) = self.store.save(&inner.entries) {
            inner.entries[idx] = previous;
            tracing::error!(entry_id = %id, error = %err, "failed to persist edit");
            return Err(err.into());
        }

        inner.state = ControllerState::Idle;
        tracing::info!(entry_id = %id, "entry updated");
        Ok(true)
    }

    // ---------------------------------------------------------------------
    // Export
    // ---------------------------------------------------------------------

    /// Render `target` to `{filename_base}.png` and return that filename.
    ///
    /// The controller is busy until the exporter settles. The busy state is
    /// cleared on success, on failure, and if this future is dropped early.
    pub async fn export_view(
        &self,
        target: &X::Target,
        filename_base: &str,
    ) -> Result<String, LedgerError> {
        let guard = self.begin_export()?;
        let filename = format!("{filename_base}.png");
        tracing::info!(%filename, "export started");

        let result = self.exporter.export_as_image(target, &filename).await;
        drop(guard);

        let mut inner = self.lock();
        match result {
            Ok(()) => {
                tracing::info!(%filename, "export finished");
                inner.notices.push(Notice::Exported {
                    filename: filename.clone(),
                });
                Ok(filename)
            }
            Err(err) => {
                tracing::error!(%filename, error = %err, "export failed");
                inner.notices.push(Notice::ExportFailed {
                    filename,
                    reason: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    /// [`export_view`](Self::export_view) under `{prefix}-{today}`.
    pub async fn export_view_dated(&self, target: &X::Target) -> Result<String, LedgerError> {
        let base = export_file_base(&self.export_prefix, Local::now().date_naive());
        self.export_view(target, &base).await
    }

    fn begin_export(&self) -> Result<ExportGuard<'_>, LedgerError> {
        let mut inner = self.lock();
        inner.ensure_not_exporting()?;

        let resume = match mem::take(&mut inner.state) {
            ControllerState::Composing(session) => Some(session),
            _ => None,
        };
        inner.state = ControllerState::Exporting { resume };
        Ok(ExportGuard { inner: &self.inner })
    }

    /// Outcomes to surface to the user, oldest first.
    pub fn take_notices(&self) -> Vec<Notice> {
        mem::take(&mut self.lock().notices)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn state(&self) -> ControllerState {
        self.lock().state.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().state.is_exporting()
    }

    /// Snapshot of the collection, newest first.
    pub fn entries(&self) -> Vec<CashEntry> {
        self.lock().entries.clone()
    }

    pub fn entry(&self, id: EntryId) -> Option<CashEntry> {
        let inner = self.lock();
        inner.position(id).map(|idx| inner.entries[idx].clone())
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn filter(&self, filter: &EntryFilter) -> Vec<CashEntry> {
        let inner = self.lock();
        ledger::filter(&inner.entries, filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Net balances over the entries selected by `filter`.
    pub fn aggregate(&self, filter: &EntryFilter) -> NetBalance {
        let inner = self.lock();
        ledger::aggregate(ledger::filter(&inner.entries, filter))
    }

    pub fn totals(&self, filter: &EntryFilter) -> LedgerTotals {
        let inner = self.lock();
        ledger::totals(ledger::filter(&inner.entries, filter))
    }

    /// Cumulative balance at every entry, in collection order.
    pub fn running_balances(&self) -> Vec<(EntryId, NetBalance)> {
        let inner = self.lock();
        inner
            .entries
            .iter()
            .map(CashEntry::id_typed)
            .zip(ledger::running_balances(&inner.entries))
            .collect()
    }

    pub fn balances_by_category(&self, categories: &[AccountingCategory]) -> Vec<CategoryBalance> {
        ledger::balances_by_category(&self.lock().entries, categories)
    }
}

/// Restores the pre-export state when dropped.
struct ExportGuard<'a> {
    inner: &'a Mutex<Inner>,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.state = match mem::take(&mut inner.state) {
            ControllerState::Exporting { resume } => resume
                .map(ControllerState::Composing)
                .unwrap_or_default(),
            other => other,
        };
        tracing::debug!("export settled");
    }
}

//! Controller state machine types.

use cashbook_core::EntryId;
use cashbook_ledger::EntryDraft;

/// An open add or edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeSession {
    pub draft: EntryDraft,
    /// `None` while adding; the target entry while editing.
    pub editing_id: Option<EntryId>,
}

impl ComposeSession {
    pub fn adding(draft: EntryDraft) -> Self {
        Self {
            draft,
            editing_id: None,
        }
    }

    pub fn editing(id: EntryId, draft: EntryDraft) -> Self {
        Self {
            draft,
            editing_id: Some(id),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing_id.is_some()
    }
}

/// What the controller is doing.
///
/// At most one compose session exists at a time. While exporting, an open
/// session is parked in `resume` and restored when the export settles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ControllerState {
    #[default]
    Idle,
    Composing(ComposeSession),
    Exporting { resume: Option<ComposeSession> },
}

impl ControllerState {
    pub fn is_exporting(&self) -> bool {
        matches!(self, ControllerState::Exporting { .. })
    }

    pub fn session(&self) -> Option<&ComposeSession> {
        match self {
            ControllerState::Composing(session) => Some(session),
            _ => None,
        }
    }
}

/// Pending delete confirmation issued by `LedgerController::request_delete`.
///
/// Only the most recently issued token can be confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeleteToken {
    entry_id: EntryId,
    serial: u64,
}

impl DeleteToken {
    pub(crate) fn new(entry_id: EntryId, serial: u64) -> Self {
        Self { entry_id, serial }
    }

    pub fn entry_id(&self) -> EntryId {
        self.entry_id
    }
}

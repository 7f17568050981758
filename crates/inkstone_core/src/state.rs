use crate::view_model::{AppViewModel, ItemRow};
use crate::{DraftId, EditSession, ListState, TransitionKind, ValidationError};

/// User-facing result of the last action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Done(TransitionKind),
    Invalid(ValidationError),
    Failed {
        kind: TransitionKind,
        reason: String,
    },
    /// Withdraw kept a local copy but the server still has the poem.
    WithdrawIncomplete {
        draft_id: DraftId,
        reason: String,
    },
    /// Publish created `item_id` but the source draft is still stored.
    PublishIncomplete {
        item_id: u64,
        draft_id: DraftId,
        reason: String,
    },
    ListUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) list: ListState,
    pub(crate) editor: Option<EditSession>,
    pub(crate) pending: Option<TransitionKind>,
    pub(crate) notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &ListState {
        &self.list
    }

    pub fn editor(&self) -> Option<&EditSession> {
        self.editor.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Transition currently running; further transition clicks are ignored.
    pub fn pending(&self) -> Option<TransitionKind> {
        self.pending
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            items: self.list.items().iter().map(ItemRow::from).collect(),
            has_more: self.list.has_more(),
            loading: self.list.is_loading(),
            search: self.list.search().to_string(),
            editing: self.editor.as_ref().map(|session| session.target.clone()),
            busy: self.pending,
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

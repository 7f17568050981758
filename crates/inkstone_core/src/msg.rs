use crate::{FetchTicket, ItemId, PageBatch, PoemFields, Stamp, TransitionKind, TransitionOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Reload the first page; drafts are merged in when no search is active.
    RefreshRequested,
    /// User asked for the next server page.
    LoadMoreRequested,
    /// Search box text changed (debounced). Empty clears the filter.
    SearchChanged(String),
    /// A list fetch finished, successfully or not.
    ListLoaded {
        ticket: FetchTicket,
        result: Result<PageBatch, String>,
    },
    /// Open an empty editor for a new poem.
    NewPoemClicked { author: String },
    /// Open the editor on a listed draft or published poem.
    EditRequested(ItemId),
    /// Editor form contents changed.
    FieldsChanged(PoemFields),
    EditorClosed,
    SaveDraftClicked(Stamp),
    PublishClicked(Stamp),
    UpdateClicked(Stamp),
    WithdrawClicked(Stamp),
    /// Permanently remove a draft or a published poem.
    DiscardClicked(ItemId),
    /// Engine finished running a transition effect.
    TransitionDone {
        kind: TransitionKind,
        outcome: TransitionOutcome,
    },
    NoticeDismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

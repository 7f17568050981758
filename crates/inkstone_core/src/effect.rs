use crate::{Draft, DraftId, FetchTicket, PoemFields};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchList(FetchTicket),
    SaveDraft(Draft),
    /// Create on the server, then drop `source` from the draft store.
    Publish {
        fields: PoemFields,
        source: Option<DraftId>,
    },
    UpdatePublished {
        id: u64,
        fields: PoemFields,
    },
    /// Store `draft` locally, then delete `id` on the server.
    Withdraw {
        id: u64,
        draft: Draft,
    },
    DeleteDraft(DraftId),
    DeletePublished(u64),
}

impl Effect {
    pub fn transition_kind(&self) -> Option<TransitionKind> {
        match self {
            Effect::FetchList(_) => None,
            Effect::SaveDraft(_) => Some(TransitionKind::SaveDraft),
            Effect::Publish { .. } => Some(TransitionKind::Publish),
            Effect::UpdatePublished { .. } => Some(TransitionKind::Update),
            Effect::Withdraw { .. } => Some(TransitionKind::Withdraw),
            Effect::DeleteDraft(_) | Effect::DeletePublished(_) => Some(TransitionKind::Discard),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    SaveDraft,
    Publish,
    Update,
    Withdraw,
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Completed,
    /// The transition did not complete; `reason` is shown to the user.
    Failed { reason: String },
    /// The local copy was saved but the server delete failed, so both exist.
    WithdrawnLocally { draft_id: DraftId, reason: String },
    /// Created on the server as `item_id`, but the source draft could not be
    /// removed, so both exist.
    PublishedKeptDraft {
        item_id: u64,
        draft_id: DraftId,
        reason: String,
    },
}

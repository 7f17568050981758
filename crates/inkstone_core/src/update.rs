use crate::{
    Applied, AppState, EditSession, EditTarget, Effect, ItemId, Msg, Notice, TransitionKind,
    TransitionOutcome, ValidationError,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::RefreshRequested => {
            state.mark_dirty();
            vec![Effect::FetchList(state.list.begin_refresh())]
        }
        Msg::LoadMoreRequested => match state.list.begin_load_more() {
            Some(ticket) => {
                state.mark_dirty();
                vec![Effect::FetchList(ticket)]
            }
            None => Vec::new(),
        },
        Msg::SearchChanged(term) => {
            if term.trim() == state.list.search() {
                return (state, Vec::new());
            }
            state.mark_dirty();
            vec![Effect::FetchList(state.list.begin_search(&term))]
        }
        Msg::ListLoaded { ticket, result } => {
            let reason = result.as_ref().err().cloned();
            match state.list.apply(&ticket, result) {
                Applied::Stale => {}
                Applied::Merged { .. } => state.mark_dirty(),
                Applied::Failed => {
                    state.notice = reason.map(Notice::ListUnavailable);
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::NewPoemClicked { author } => {
            state.editor = Some(EditSession::new_poem(author));
            state.mark_dirty();
            Vec::new()
        }
        Msg::EditRequested(id) => {
            if let Some(item) = state.list.find(&id) {
                state.editor = Some(EditSession::from_item(item));
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FieldsChanged(fields) => {
            if let Some(session) = state.editor.as_mut() {
                session.fields = fields;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::EditorClosed => {
            if state.editor.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SaveDraftClicked(stamp) => {
            plan_from_editor(&mut state, |session| {
                session.draft_for_save(&stamp).map(Effect::SaveDraft)
            })
        }
        Msg::PublishClicked(stamp) => plan_from_editor(&mut state, |session| {
            let source = session.publish_source()?;
            let fields = session.validated_fields(&stamp)?;
            Ok(Effect::Publish { fields, source })
        }),
        Msg::UpdateClicked(stamp) => plan_from_editor(&mut state, |session| {
            let EditTarget::Published(id) = session.target else {
                return Err(ValidationError::WrongTarget { action: "update" });
            };
            let fields = session.validated_fields(&stamp)?;
            Ok(Effect::UpdatePublished { id, fields })
        }),
        Msg::WithdrawClicked(stamp) => plan_from_editor(&mut state, |session| {
            let (id, draft) = session.withdrawn_draft(&stamp)?;
            Ok(Effect::Withdraw { id, draft })
        }),
        Msg::DiscardClicked(id) => {
            if state.pending.is_some() {
                return (state, Vec::new());
            }
            let effect = match id {
                ItemId::Local(draft_id) => Effect::DeleteDraft(draft_id),
                ItemId::Remote(id) => Effect::DeletePublished(id),
            };
            state.pending = Some(TransitionKind::Discard);
            state.mark_dirty();
            vec![effect]
        }
        Msg::TransitionDone { kind, outcome } => {
            state.pending = None;
            state.mark_dirty();
            match outcome {
                TransitionOutcome::Completed => {
                    if kind != TransitionKind::Discard {
                        state.editor = None;
                    }
                    state.notice = Some(Notice::Done(kind));
                    vec![Effect::FetchList(state.list.begin_refresh())]
                }
                TransitionOutcome::Failed { reason } => {
                    state.notice = Some(Notice::Failed { kind, reason });
                    Vec::new()
                }
                TransitionOutcome::WithdrawnLocally { draft_id, reason } => {
                    state.editor = None;
                    state.notice = Some(Notice::WithdrawIncomplete { draft_id, reason });
                    vec![Effect::FetchList(state.list.begin_refresh())]
                }
                TransitionOutcome::PublishedKeptDraft {
                    item_id,
                    draft_id,
                    reason,
                } => {
                    state.editor = None;
                    state.notice = Some(Notice::PublishIncomplete {
                        item_id,
                        draft_id,
                        reason,
                    });
                    vec![Effect::FetchList(state.list.begin_refresh())]
                }
            }
        }
        Msg::NoticeDismissed => {
            if state.notice.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn plan_from_editor(
    state: &mut AppState,
    plan: impl FnOnce(&EditSession) -> Result<Effect, ValidationError>,
) -> Vec<Effect> {
    if state.pending.is_some() {
        return Vec::new();
    }
    let planned = match state.editor.as_ref() {
        Some(session) => plan(session),
        None => return Vec::new(),
    };
    state.mark_dirty();
    match planned {
        Ok(effect) => {
            state.pending = effect.transition_kind();
            state.notice = None;
            vec![effect]
        }
        Err(err) => {
            state.notice = Some(Notice::Invalid(err));
            Vec::new()
        }
    }
}

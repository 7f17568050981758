use std::collections::VecDeque;
use std::sync::Arc;

use futures_util::future::join_all;
use inkstone_core::{
    update, AppState, AppViewModel, Effect, FetchTicket, Msg, PageBatch, TransitionOutcome,
};
use inkstone_logging::{ink_debug, ink_info, ink_warn};

use crate::{ContentApi, DraftStore, PageQuery, StoreError};

/// Runs effects against the draft store and the server.
///
/// Holds only shared handles, so clones can run effects concurrently.
pub struct Executor<S, A> {
    store: Arc<S>,
    api: Arc<A>,
}

impl<S, A> Clone for Executor<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            api: Arc::clone(&self.api),
        }
    }
}

impl<S: DraftStore, A: ContentApi> Executor<S, A> {
    pub fn new(store: Arc<S>, api: Arc<A>) -> Self {
        Self { store, api }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one effect and returns the message reporting its result.
    pub async fn execute(&self, effect: Effect) -> Msg {
        let effect = match effect {
            Effect::FetchList(ticket) => {
                let result = self.fetch(&ticket).await;
                return Msg::ListLoaded { ticket, result };
            }
            other => other,
        };
        let Some(kind) = effect.transition_kind() else {
            return Msg::NoOp;
        };
        ink_info!("Running {kind:?}");

        let outcome = match effect {
            Effect::FetchList(_) => return Msg::NoOp,
            Effect::SaveDraft(draft) => match self.store.save(&draft).await {
                Ok(()) => TransitionOutcome::Completed,
                Err(err) => failed(err),
            },
            Effect::Publish { fields, source } => {
                match self.api.create(&fields).await {
                    Err(err) => failed(err),
                    Ok(created) => {
                        ink_info!("Published poem {}", created.id);
                        match source {
                            None => TransitionOutcome::Completed,
                            Some(draft_id) => match self.store.delete(&draft_id).await {
                                Ok(()) => TransitionOutcome::Completed,
                                Err(err) => {
                                    ink_warn!(
                                        "Published {} but kept draft {draft_id}: {err}",
                                        created.id
                                    );
                                    TransitionOutcome::PublishedKeptDraft {
                                        item_id: created.id,
                                        draft_id,
                                        reason: err.to_string(),
                                    }
                                }
                            },
                        }
                    }
                }
            }
            Effect::UpdatePublished { id, fields } => match self.api.update(id, &fields).await {
                Ok(()) => TransitionOutcome::Completed,
                Err(err) => failed(err),
            },
            Effect::Withdraw { id, draft } => match self.store.save(&draft).await {
                Err(err) => failed(err),
                Ok(()) => match self.api.delete(id).await {
                    Ok(()) => TransitionOutcome::Completed,
                    Err(err) => {
                        ink_warn!("Withdraw of {id} kept local copy {}: {err}", draft.id);
                        TransitionOutcome::WithdrawnLocally {
                            draft_id: draft.id,
                            reason: err.to_string(),
                        }
                    }
                },
            },
            Effect::DeleteDraft(draft_id) => match self.store.delete(&draft_id).await {
                Ok(()) => TransitionOutcome::Completed,
                Err(err) => failed(err),
            },
            Effect::DeletePublished(id) => match self.api.delete(id).await {
                Ok(()) => TransitionOutcome::Completed,
                Err(err) => failed(err),
            },
        };
        if let TransitionOutcome::Failed { reason } = &outcome {
            ink_warn!("{kind:?} failed: {reason}");
        }
        Msg::TransitionDone { kind, outcome }
    }

    /// Server page first; drafts only for an unfiltered first page, and a
    /// broken draft store only costs the drafts.
    async fn fetch(&self, ticket: &FetchTicket) -> Result<PageBatch, String> {
        let items = self
            .api
            .list(&PageQuery::from(ticket))
            .await
            .map_err(|err| err.to_string())?;

        let drafts = if ticket.include_drafts {
            match self.store.get_all().await {
                Ok(drafts) => drafts,
                Err(err) => {
                    ink_warn!("Listing without drafts: {err}");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        ink_debug!(
            "Fetched page {} ({} items, {} drafts)",
            ticket.page,
            items.len(),
            drafts.len()
        );
        Ok(PageBatch { drafts, items })
    }
}

fn failed(err: impl std::fmt::Display) -> TransitionOutcome {
    TransitionOutcome::Failed {
        reason: err.to_string(),
    }
}

/// Owns the application state and feeds effect results back into `update`.
pub struct Reconciler<S, A> {
    state: AppState,
    executor: Executor<S, A>,
}

impl<S: DraftStore, A: ContentApi> Reconciler<S, A> {
    pub fn new(store: Arc<S>, api: Arc<A>) -> Self {
        Self {
            state: AppState::new(),
            executor: Executor::new(store, api),
        }
    }

    /// Opens the draft store and loads the first page. A store that cannot be
    /// opened is reported and the list runs without drafts.
    pub async fn initialize(&mut self) -> Result<(), StoreError> {
        let opened = self.executor.store().initialize().await;
        if let Err(err) = &opened {
            ink_warn!("Draft store unavailable: {err}");
        }
        self.dispatch(Msg::RefreshRequested).await;
        opened
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn executor(&self) -> Executor<S, A> {
        self.executor.clone()
    }

    /// Applies one message and hands back the effects without running them.
    pub fn apply(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        effects
    }

    /// Applies `msg`, runs every resulting effect until the state settles and
    /// returns whether anything changed.
    pub async fn dispatch(&mut self, msg: Msg) -> bool {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let effects = self.apply(msg);
            if effects.is_empty() {
                continue;
            }
            let executor = &self.executor;
            let results = join_all(effects.into_iter().map(|effect| executor.execute(effect))).await;
            queue.extend(results);
        }
        self.state.consume_dirty()
    }
}

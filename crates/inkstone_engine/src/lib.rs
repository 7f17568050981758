//! Inkstone engine: draft storage, REST client and effect execution.
mod api;
mod chat;
mod drafts;
mod filename;
mod reconciler;
mod types;

pub use api::{ApiSettings, ChatApi, ContentApi, PageQuery, ReqwestApiClient};
pub use chat::{ChatPoller, ChatUpdate};
pub use drafts::{DraftStore, FileDraftStore, MemoryDraftStore, StoreError, DEFAULT_NAMESPACE};
pub use filename::draft_filename;
pub use reconciler::{Executor, Reconciler};
pub use types::{ApiError, FailureKind};

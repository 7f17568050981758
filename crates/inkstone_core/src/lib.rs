//! Inkstone core: pure draft/list state machine and view-model helpers.
mod chat;
mod editor;
mod effect;
mod ids;
mod item;
mod listing;
mod msg;
mod pagination;
mod state;
mod update;
mod view_model;

pub use chat::{ChatDelta, ChatFeed, ChatMessage, CHAT_WINDOW};
pub use editor::{EditSession, EditTarget, Stamp, ValidationError};
pub use effect::{Effect, TransitionKind, TransitionOutcome};
pub use ids::{DraftId, ItemId};
pub use item::{Draft, ListItem, PoemFields, PublishedItem};
pub use listing::{Applied, FetchTicket, ListState, PageBatch};
pub use msg::Msg;
pub use pagination::{Collection, FullPageHeuristic, MorePages, Pagination, SEARCH_LIMIT};
pub use state::{AppState, Notice};
pub use update::update;
pub use view_model::{AppViewModel, ItemRow};

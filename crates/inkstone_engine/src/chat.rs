use std::sync::Arc;

use inkstone_core::{ChatDelta, ChatFeed};
use inkstone_logging::ink_info;

use crate::{ApiError, ChatApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatUpdate {
    Appended(usize),
    /// The server list restarted; the feed was replaced with it.
    Reset,
    Unchanged,
}

/// Keeps a [`ChatFeed`] in step with the server by polling for newer ids.
pub struct ChatPoller<A> {
    api: Arc<A>,
    feed: ChatFeed,
}

impl<A: ChatApi> ChatPoller<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            feed: ChatFeed::new(),
        }
    }

    pub fn feed(&self) -> &ChatFeed {
        &self.feed
    }

    /// Replaces the feed with the full server list.
    pub async fn load_all(&mut self) -> Result<(), ApiError> {
        let all = self.api.messages_after(0).await?;
        self.feed.replace(all);
        Ok(())
    }

    pub async fn poll(&mut self) -> Result<ChatUpdate, ApiError> {
        let batch = self.api.messages_after(self.feed.after_id()).await?;
        match self.feed.apply_incremental(batch) {
            ChatDelta::Appended(count) => Ok(ChatUpdate::Appended(count)),
            ChatDelta::Unchanged => Ok(ChatUpdate::Unchanged),
            ChatDelta::NeedsResetCheck => {
                let all = self.api.messages_after(0).await?;
                if self.feed.apply_reset_check(all) {
                    ink_info!("Chat history was reset on the server");
                    Ok(ChatUpdate::Reset)
                } else {
                    Ok(ChatUpdate::Unchanged)
                }
            }
        }
    }
}

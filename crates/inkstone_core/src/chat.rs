use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Most recent messages kept for display.
pub const CHAT_WINDOW: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub is_guest: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatDelta {
    Appended(usize),
    /// Nothing new although messages were seen before: the server may have
    /// restarted and renumbered, so the full list must be checked.
    NeedsResetCheck,
    Unchanged,
}

/// Incrementally polled chat window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatFeed {
    messages: VecDeque<ChatMessage>,
    last_id: u64,
    window: usize,
}

impl Default for ChatFeed {
    fn default() -> Self {
        Self::with_window(CHAT_WINDOW)
    }
}

impl ChatFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            last_id: 0,
            window: window.max(1),
        }
    }

    /// Id to poll after; 0 asks for everything.
    pub fn after_id(&self) -> u64 {
        self.last_id
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn apply_incremental(&mut self, batch: Vec<ChatMessage>) -> ChatDelta {
        if batch.is_empty() {
            return if self.last_id > 0 {
                ChatDelta::NeedsResetCheck
            } else {
                ChatDelta::Unchanged
            };
        }

        let floor = self.last_id;
        let mut appended = 0;
        for message in batch {
            if message.id <= floor {
                continue;
            }
            self.last_id = self.last_id.max(message.id);
            self.messages.push_back(message);
            appended += 1;
        }
        self.trim();

        if appended == 0 {
            ChatDelta::Unchanged
        } else {
            ChatDelta::Appended(appended)
        }
    }

    /// Compares the full server list against what was seen. An empty list, or
    /// one ending below `last_id`, means the server was reset; the window is
    /// then replaced. Returns whether that happened.
    pub fn apply_reset_check(&mut self, all: Vec<ChatMessage>) -> bool {
        let reset = match all.last() {
            None => true,
            Some(last) => last.id < self.last_id,
        };
        if reset {
            self.replace(all);
        }
        reset
    }

    pub fn replace(&mut self, all: Vec<ChatMessage>) {
        self.last_id = all.iter().map(|m| m.id).max().unwrap_or(0);
        self.messages = all.into();
        self.trim();
    }

    fn trim(&mut self) {
        while self.messages.len() > self.window {
            self.messages.pop_front();
        }
    }
}

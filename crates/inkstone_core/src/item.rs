use serde::{Deserialize, Serialize};

use crate::{DraftId, ItemId};

/// Display fields shared by drafts and published poems.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoemFields {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub date: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub id: DraftId,
    #[serde(flatten)]
    pub fields: PoemFields,
}

/// Server-authoritative poem record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedItem {
    pub id: u64,
    #[serde(flatten)]
    pub fields: PoemFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<u64>,
}

/// One row of the merged list, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Local(Draft),
    Published(PublishedItem),
}

impl ListItem {
    pub fn id(&self) -> ItemId {
        match self {
            ListItem::Local(draft) => ItemId::Local(draft.id.clone()),
            ListItem::Published(item) => ItemId::Remote(item.id),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ListItem::Local(_))
    }

    pub fn fields(&self) -> &PoemFields {
        match self {
            ListItem::Local(draft) => &draft.fields,
            ListItem::Published(item) => &item.fields,
        }
    }
}

impl From<Draft> for ListItem {
    fn from(draft: Draft) -> Self {
        ListItem::Local(draft)
    }
}

impl From<PublishedItem> for ListItem {
    fn from(item: PublishedItem) -> Self {
        ListItem::Published(item)
    }
}

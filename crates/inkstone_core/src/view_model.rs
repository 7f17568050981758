use crate::{EditTarget, ItemId, ListItem, Notice, TransitionKind};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub items: Vec<ItemRow>,
    pub has_more: bool,
    pub loading: bool,
    pub search: String,
    pub editing: Option<EditTarget>,
    pub busy: Option<TransitionKind>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub id: ItemId,
    pub title: String,
    pub kind: String,
    pub author: String,
    pub date: String,
    pub is_local: bool,
}

impl From<&ListItem> for ItemRow {
    fn from(item: &ListItem) -> Self {
        let fields = item.fields();
        Self {
            id: item.id(),
            title: fields.title.clone(),
            kind: fields.kind.clone(),
            author: fields.author.clone(),
            date: fields.date.clone(),
            is_local: item.is_local(),
        }
    }
}

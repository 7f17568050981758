use std::fmt;

use crate::{Draft, DraftId, ListItem, PoemFields};

/// Wall-clock reading supplied by the shell, keeping `update` pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub epoch_millis: i64,
    /// Local time as `YYYY-MM-DDTHH:MM`, the default for an empty date field.
    pub local_iso: String,
}

/// What the open editor is working on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Draft(DraftId),
    Published(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingTitle,
    MissingContent,
    WrongTarget { action: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingTitle => write!(f, "title is required"),
            ValidationError::MissingContent => write!(f, "content is required"),
            ValidationError::WrongTarget { action } => {
                write!(f, "cannot {action} the item being edited")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub target: EditTarget,
    pub fields: PoemFields,
}

impl EditSession {
    pub fn new_poem(author: impl Into<String>) -> Self {
        Self {
            target: EditTarget::New,
            fields: PoemFields {
                author: author.into(),
                ..PoemFields::default()
            },
        }
    }

    pub fn from_item(item: &ListItem) -> Self {
        let target = match item {
            ListItem::Local(draft) => EditTarget::Draft(draft.id.clone()),
            ListItem::Published(published) => EditTarget::Published(published.id),
        };
        Self {
            target,
            fields: item.fields().clone(),
        }
    }

    /// Fields ready to send or store: title and content present, date filled.
    pub fn validated_fields(&self, stamp: &Stamp) -> Result<PoemFields, ValidationError> {
        if self.fields.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.fields.content.trim().is_empty() {
            return Err(ValidationError::MissingContent);
        }
        Ok(with_default_date(self.fields.clone(), stamp))
    }

    /// Draft to upsert: an edited draft keeps its id, a new poem gets a fresh one.
    pub fn draft_for_save(&self, stamp: &Stamp) -> Result<Draft, ValidationError> {
        let id = match &self.target {
            EditTarget::Draft(id) => id.clone(),
            EditTarget::New => DraftId::from_millis(stamp.epoch_millis),
            EditTarget::Published(_) => {
                return Err(ValidationError::WrongTarget {
                    action: "save a draft of",
                })
            }
        };
        Ok(Draft {
            id,
            fields: self.validated_fields(stamp)?,
        })
    }

    /// Source draft to remove once a publish succeeds.
    pub fn publish_source(&self) -> Result<Option<DraftId>, ValidationError> {
        match &self.target {
            EditTarget::New => Ok(None),
            EditTarget::Draft(id) => Ok(Some(id.clone())),
            EditTarget::Published(_) => Err(ValidationError::WrongTarget { action: "publish" }),
        }
    }

    /// Server id plus the fresh local copy a withdraw stores first.
    ///
    /// The copy always gets a new id, never the published item's.
    pub fn withdrawn_draft(&self, stamp: &Stamp) -> Result<(u64, Draft), ValidationError> {
        let EditTarget::Published(id) = self.target else {
            return Err(ValidationError::WrongTarget { action: "withdraw" });
        };
        let draft = Draft {
            id: DraftId::from_millis(stamp.epoch_millis),
            fields: with_default_date(self.fields.clone(), stamp),
        };
        Ok((id, draft))
    }
}

fn with_default_date(mut fields: PoemFields, stamp: &Stamp) -> PoemFields {
    if fields.date.trim().is_empty() {
        fields.date = stamp.local_iso.clone();
    }
    fields
}

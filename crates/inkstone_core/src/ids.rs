use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const DRAFT_PREFIX: &str = "draft_";

/// Identifier of a locally stored draft, `draft_<epoch-millis>` when generated here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftId(String);

impl DraftId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_millis(epoch_millis: i64) -> Self {
        Self(format!("{DRAFT_PREFIX}{epoch_millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a row in the merged list.
///
/// Local and remote ids live in separate variants, so a draft can never be
/// mistaken for a server item even if their textual forms happen to match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Remote(u64),
    Local(DraftId),
}

impl ItemId {
    pub fn is_local(&self) -> bool {
        matches!(self, ItemId::Local(_))
    }
}

impl From<DraftId> for ItemId {
    fn from(id: DraftId) -> Self {
        ItemId::Local(id)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        ItemId::Remote(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Remote(id) => write!(f, "{id}"),
            ItemId::Local(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyItemId;

impl fmt::Display for EmptyItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("empty item id")
    }
}

impl std::error::Error for EmptyItemId {}

/// All-digit text is a server id; anything else names a draft.
impl FromStr for ItemId {
    type Err = EmptyItemId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EmptyItemId);
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = trimmed.parse::<u64>() {
                return Ok(ItemId::Remote(id));
            }
        }
        Ok(ItemId::Local(DraftId::new(trimmed)))
    }
}

#[cfg(test)]
mod tests {
    use super::{DraftId, ItemId};

    #[test]
    fn generated_draft_ids_carry_prefix() {
        assert_eq!(DraftId::from_millis(1_700_000_000_000).as_str(), "draft_1700000000000");
    }

    #[test]
    fn parse_splits_numeric_and_local() {
        assert_eq!("42".parse::<ItemId>().unwrap(), ItemId::Remote(42));
        assert_eq!(
            " draft_1 ".parse::<ItemId>().unwrap(),
            ItemId::Local(DraftId::new("draft_1"))
        );
        assert!("  ".parse::<ItemId>().is_err());
    }

    #[test]
    fn local_and_remote_never_compare_equal() {
        let local = ItemId::Local(DraftId::new("42"));
        assert_ne!(local, ItemId::Remote(42));
    }
}

/// Page size used while a search term is active.
pub const SEARCH_LIMIT: u32 = 20;

/// Server collections that are listed page by page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Poems,
    Members,
    Finance,
    Tasks,
    Activities,
}

impl Collection {
    /// Path segment under the API base.
    pub fn path(self) -> &'static str {
        match self {
            Collection::Poems => "poems",
            Collection::Members => "members",
            Collection::Finance => "finance",
            Collection::Tasks => "tasks",
            Collection::Activities => "activities",
        }
    }

    pub fn page_limit(self) -> u32 {
        match self {
            Collection::Poems | Collection::Tasks | Collection::Activities => 10,
            Collection::Members => 12,
            Collection::Finance => 20,
        }
    }
}

/// Decides whether another page should be requested after one came back.
pub trait MorePages {
    fn has_more(&self, fetched: usize, limit: u32) -> bool;
}

/// A full page means there may be more; a short page is the last one.
///
/// Reports one extra (empty) page when the final page is exactly `limit` long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FullPageHeuristic;

impl MorePages for FullPageHeuristic {
    fn has_more(&self, fetched: usize, limit: u32) -> bool {
        fetched >= limit as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub next_page: u32,
    pub has_more: bool,
    pub limit: u32,
}

impl Pagination {
    pub fn new(limit: u32) -> Self {
        Self {
            next_page: 1,
            has_more: true,
            limit,
        }
    }

    pub fn for_collection(collection: Collection) -> Self {
        Self::new(collection.page_limit())
    }

    /// Records that `page`, requested with `limit`, came back with `fetched` items.
    pub fn record_page(&mut self, page: u32, limit: u32, fetched: usize, policy: &impl MorePages) {
        self.has_more = policy.has_more(fetched, limit);
        self.next_page = page.saturating_add(1);
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::for_collection(Collection::Poems)
    }
}

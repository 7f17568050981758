use crate::pagination::{FullPageHeuristic, MorePages, Pagination, SEARCH_LIMIT};
use crate::{Draft, ItemId, ListItem, PublishedItem};

/// One list request as issued; echoed back with its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub page: u32,
    pub limit: u32,
    pub query: Option<String>,
    pub include_drafts: bool,
    pub append: bool,
}

/// What a fetch produced: the server page plus, on the unfiltered first page,
/// the local drafts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageBatch {
    pub drafts: Vec<Draft>,
    pub items: Vec<PublishedItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Merged { drafts: usize, items: usize },
    /// A newer request superseded this one; its result was dropped.
    Stale,
    Failed,
}

/// The merged draft + server list and its pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListState<H = FullPageHeuristic> {
    items: Vec<ListItem>,
    pagination: Pagination,
    search: String,
    latest_seq: u64,
    in_flight: Option<u64>,
    policy: H,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: MorePages> ListState<H> {
    pub fn with_policy(limit: u32, policy: H) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::new(limit),
            search: String::new(),
            latest_seq: 0,
            in_flight: None,
            policy,
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn find(&self, id: &ItemId) -> Option<&ListItem> {
        self.items.iter().find(|item| &item.id() == id)
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn has_more(&self) -> bool {
        self.pagination.has_more
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Starts a first-page fetch. Items and pagination stay as they are until
    /// the result is applied, so a failed refresh keeps the current list.
    pub fn begin_refresh(&mut self) -> FetchTicket {
        let seq = self.next_seq();
        let query = self.query();
        FetchTicket {
            seq,
            page: 1,
            limit: self.page_limit(),
            include_drafts: query.is_none(),
            query,
            append: false,
        }
    }

    pub fn begin_search(&mut self, term: &str) -> FetchTicket {
        self.search = term.trim().to_string();
        self.begin_refresh()
    }

    /// Next-page fetch, or `None` when the list is exhausted or another
    /// request for it is still running.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if !self.pagination.has_more || self.in_flight.is_some() {
            return None;
        }
        let seq = self.next_seq();
        Some(FetchTicket {
            seq,
            page: self.pagination.next_page,
            limit: self.page_limit(),
            query: self.query(),
            include_drafts: false,
            append: true,
        })
    }

    pub fn apply<E>(&mut self, ticket: &FetchTicket, outcome: Result<PageBatch, E>) -> Applied {
        if ticket.seq != self.latest_seq {
            return Applied::Stale;
        }
        self.in_flight = None;

        let Ok(batch) = outcome else {
            return Applied::Failed;
        };

        let fetched = batch.items.len();
        let server = batch.items.into_iter().map(ListItem::Published);
        let drafts = if ticket.include_drafts && !ticket.append {
            batch.drafts
        } else {
            Vec::new()
        };
        let draft_count = drafts.len();

        if ticket.append {
            self.items.extend(server);
        } else {
            self.items = drafts.into_iter().map(ListItem::Local).chain(server).collect();
        }
        self.pagination
            .record_page(ticket.page, ticket.limit, fetched, &self.policy);

        Applied::Merged {
            drafts: draft_count,
            items: fetched,
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.latest_seq += 1;
        self.in_flight = Some(self.latest_seq);
        self.latest_seq
    }

    fn page_limit(&self) -> u32 {
        if self.search.is_empty() {
            self.pagination.limit
        } else {
            SEARCH_LIMIT
        }
    }

    fn query(&self) -> Option<String> {
        if self.search.is_empty() {
            None
        } else {
            Some(self.search.clone())
        }
    }
}

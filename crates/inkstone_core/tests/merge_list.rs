use inkstone_core::{
    Applied, Draft, DraftId, FetchTicket, FullPageHeuristic, ItemId, ListState, PageBatch,
    PoemFields, PublishedItem, SEARCH_LIMIT,
};
use pretty_assertions::assert_eq;

fn draft(id: &str) -> Draft {
    Draft {
        id: DraftId::new(id),
        fields: PoemFields {
            title: format!("title {id}"),
            content: "...".to_string(),
            ..PoemFields::default()
        },
    }
}

fn published(id: u64) -> PublishedItem {
    PublishedItem {
        id,
        fields: PoemFields {
            title: format!("poem {id}"),
            ..PoemFields::default()
        },
        author_id: None,
    }
}

fn ids(state: &ListState<FullPageHeuristic>) -> Vec<ItemId> {
    state.items().iter().map(|item| item.id()).collect()
}

fn load(state: &mut ListState, ticket: &FetchTicket, drafts: Vec<Draft>, items: Vec<PublishedItem>) -> Applied {
    state.apply::<String>(ticket, Ok(PageBatch { drafts, items }))
}

#[test]
fn drafts_come_first_on_unfiltered_first_page() {
    let mut state = ListState::with_policy(3, FullPageHeuristic);
    let ticket = state.begin_refresh();
    assert!(ticket.include_drafts);
    assert_eq!(ticket.page, 1);

    let applied = load(
        &mut state,
        &ticket,
        vec![draft("draft_1"), draft("draft_2")],
        vec![published(1), published(2), published(3)],
    );

    assert_eq!(applied, Applied::Merged { drafts: 2, items: 3 });
    assert_eq!(
        ids(&state),
        vec![
            ItemId::Local(DraftId::new("draft_1")),
            ItemId::Local(DraftId::new("draft_2")),
            ItemId::Remote(1),
            ItemId::Remote(2),
            ItemId::Remote(3),
        ]
    );
    assert!(state.has_more());
    assert!(state.items()[0].is_local());
    assert!(!state.items()[2].is_local());
}

#[test]
fn load_more_appends_server_items_only() {
    let mut state = ListState::with_policy(2, FullPageHeuristic);
    let first = state.begin_refresh();
    load(&mut state, &first, vec![draft("draft_9")], vec![published(10), published(9)]);

    let more = state.begin_load_more().expect("more pages");
    assert_eq!(more.page, 2);
    assert!(!more.include_drafts);
    assert!(more.append);

    // A store that still reports drafts must not duplicate them on page 2.
    load(&mut state, &more, vec![draft("draft_9")], vec![published(8)]);

    assert_eq!(
        ids(&state),
        vec![
            ItemId::Local(DraftId::new("draft_9")),
            ItemId::Remote(10),
            ItemId::Remote(9),
            ItemId::Remote(8),
        ]
    );
    assert!(!state.has_more());
}

#[test]
fn short_page_stops_further_load_more() {
    let mut state = ListState::with_policy(10, FullPageHeuristic);
    let ticket = state.begin_refresh();
    load(&mut state, &ticket, Vec::new(), vec![published(1), published(2)]);

    assert!(!state.has_more());
    assert_eq!(state.begin_load_more(), None);
}

#[test]
fn exact_full_last_page_costs_one_empty_fetch() {
    let mut state = ListState::with_policy(2, FullPageHeuristic);
    let ticket = state.begin_refresh();
    load(&mut state, &ticket, Vec::new(), vec![published(2), published(1)]);
    assert!(state.has_more());

    let more = state.begin_load_more().expect("heuristic assumes more");
    load(&mut state, &more, Vec::new(), Vec::new());
    assert!(!state.has_more());
    assert_eq!(state.items().len(), 2);
}

#[test]
fn failed_fetch_keeps_existing_items_and_cursor() {
    let mut state = ListState::with_policy(2, FullPageHeuristic);
    let first = state.begin_refresh();
    load(&mut state, &first, Vec::new(), vec![published(4), published(3)]);

    let more = state.begin_load_more().expect("more pages");
    let applied = state.apply(&more, Err::<PageBatch, _>("http status 500".to_string()));

    assert_eq!(applied, Applied::Failed);
    assert_eq!(ids(&state), vec![ItemId::Remote(4), ItemId::Remote(3)]);
    assert_eq!(state.pagination().next_page, 2);
    assert!(!state.is_loading());

    let refresh = state.begin_refresh();
    state.apply(&refresh, Err::<PageBatch, _>("network error".to_string()));
    assert_eq!(ids(&state), vec![ItemId::Remote(4), ItemId::Remote(3)]);
}

#[test]
fn search_excludes_drafts_and_newest_request_wins() {
    let mut state = ListState::new();
    let a = state.begin_search("spring");
    let b = state.begin_search("autumn");
    assert_eq!(a.query.as_deref(), Some("spring"));
    assert_eq!(b.query.as_deref(), Some("autumn"));
    assert!(!b.include_drafts);
    assert_eq!(b.limit, SEARCH_LIMIT);

    // B resolves first, then the older A.
    assert_eq!(load(&mut state, &b, Vec::new(), vec![published(2)]), Applied::Merged { drafts: 0, items: 1 });
    assert_eq!(load(&mut state, &a, Vec::new(), vec![published(1)]), Applied::Stale);
    assert_eq!(ids(&state), vec![ItemId::Remote(2)]);
}

#[test]
fn stale_search_discarded_when_resolved_in_order() {
    let mut state = ListState::new();
    let a = state.begin_search("spring");
    let b = state.begin_search("autumn");

    assert_eq!(load(&mut state, &a, Vec::new(), vec![published(1)]), Applied::Stale);
    assert_eq!(ids(&state), Vec::<ItemId>::new());
    load(&mut state, &b, Vec::new(), vec![published(2)]);
    assert_eq!(ids(&state), vec![ItemId::Remote(2)]);
}

#[test]
fn clearing_search_brings_drafts_back() {
    let mut state = ListState::new();
    let searched = state.begin_search("moon");
    load(&mut state, &searched, Vec::new(), vec![published(5)]);

    let cleared = state.begin_search("   ");
    assert_eq!(cleared.query, None);
    assert!(cleared.include_drafts);
    load(&mut state, &cleared, vec![draft("draft_3")], vec![published(5)]);
    assert_eq!(
        ids(&state),
        vec![ItemId::Local(DraftId::new("draft_3")), ItemId::Remote(5)]
    );
}

#[test]
fn load_more_waits_for_in_flight_request() {
    let mut state = ListState::with_policy(1, FullPageHeuristic);
    let first = state.begin_refresh();
    assert_eq!(state.begin_load_more(), None);

    load(&mut state, &first, Vec::new(), vec![published(1)]);
    let more = state.begin_load_more().expect("page 2");
    assert_eq!(state.begin_load_more(), None);
    load(&mut state, &more, Vec::new(), vec![published(0)]);
    assert_eq!(state.items().len(), 2);
}

use std::fmt::Write as _;

use inkstone_core::{AppViewModel, ChatFeed, EditSession, EditTarget, Notice, TransitionKind};

pub fn render_view(view: &AppViewModel) -> String {
    let mut out = String::new();
    if !view.search.is_empty() {
        let _ = writeln!(out, "search: {}", view.search);
    }
    if view.items.is_empty() {
        out.push_str("(no poems)\n");
    }
    for row in &view.items {
        let origin = if row.is_local { "draft" } else { "     " };
        let _ = writeln!(
            out,
            "{origin} {:>16}  {}  [{}] {} {}",
            row.id.to_string(),
            row.title,
            row.kind,
            row.author,
            row.date
        );
    }
    if view.loading {
        out.push_str("loading...\n");
    } else if view.has_more {
        out.push_str("more available (`more`)\n");
    }
    if let Some(kind) = view.busy {
        let _ = writeln!(out, "{} in progress", label(kind));
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "> {}", notice_text(notice));
    }
    out
}

pub fn render_editor(session: &EditSession) -> String {
    let target = match &session.target {
        EditTarget::New => "new poem".to_string(),
        EditTarget::Draft(id) => format!("draft {id}"),
        EditTarget::Published(id) => format!("published poem {id}"),
    };
    let fields = &session.fields;
    let mut out = format!(
        "editing {target}\n  title: {}\n  type:  {}\n  date:  {}\n  author: {}\n",
        fields.title, fields.kind, fields.date, fields.author
    );
    for line in fields.content.lines() {
        let _ = writeln!(out, "  | {line}");
    }
    out
}

pub fn render_chat(feed: &ChatFeed) -> String {
    let mut out = String::new();
    for message in feed.messages() {
        let guest = if message.is_guest { " (guest)" } else { "" };
        let _ = writeln!(
            out,
            "[{}] {}{}: {}",
            message.timestamp, message.user_name, guest, message.content
        );
    }
    out
}

pub fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::Done(kind) => format!("{} done", label(*kind)),
        Notice::Invalid(err) => format!("cannot proceed: {err}"),
        Notice::Failed { kind, reason } => format!("{} failed: {reason}", label(*kind)),
        Notice::WithdrawIncomplete { draft_id, reason } => format!(
            "saved as {draft_id}, but the server copy could not be deleted: {reason}"
        ),
        Notice::PublishIncomplete {
            item_id,
            draft_id,
            reason,
        } => format!("published as {item_id}, but draft {draft_id} is still stored: {reason}"),
        Notice::ListUnavailable(reason) => format!("could not load poems: {reason}"),
    }
}

fn label(kind: TransitionKind) -> &'static str {
    match kind {
        TransitionKind::SaveDraft => "save draft",
        TransitionKind::Publish => "publish",
        TransitionKind::Update => "update",
        TransitionKind::Withdraw => "withdraw",
        TransitionKind::Discard => "discard",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstone_core::{DraftId, ItemId, ItemRow};

    fn row(id: ItemId, title: &str) -> ItemRow {
        ItemRow {
            is_local: id.is_local(),
            id,
            title: title.to_string(),
            kind: "poem".to_string(),
            author: "Li".to_string(),
            date: "2024-03-01T09:30".to_string(),
        }
    }

    #[test]
    fn drafts_are_marked_and_notice_shown() {
        let view = AppViewModel {
            items: vec![
                row(ItemId::Local(DraftId::new("draft_1")), "Dawn"),
                row(ItemId::Remote(7), "Dusk"),
            ],
            has_more: true,
            notice: Some(Notice::Done(TransitionKind::Publish)),
            ..AppViewModel::default()
        };

        let text = render_view(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("draft"));
        assert!(lines[0].contains("Dawn"));
        assert!(!lines[1].starts_with("draft"));
        assert!(text.contains("more available"));
        assert!(text.contains("> publish done"));
    }

    #[test]
    fn partial_publish_names_both_copies() {
        let text = notice_text(&Notice::PublishIncomplete {
            item_id: 101,
            draft_id: DraftId::new("draft_1"),
            reason: "denied".to_string(),
        });
        assert!(text.contains("101"));
        assert!(text.contains("draft_1"));
    }

    #[test]
    fn withdraw_gap_names_the_kept_draft() {
        let text = notice_text(&Notice::WithdrawIncomplete {
            draft_id: DraftId::new("draft_9"),
            reason: "timeout".to_string(),
        });
        assert!(text.contains("draft_9"));
        assert!(text.contains("timeout"));
    }
}

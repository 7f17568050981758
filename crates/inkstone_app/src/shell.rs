use std::sync::Arc;

use chrono::Local;
use inkstone_core::{Msg, PoemFields, Stamp};
use inkstone_engine::{ChatApi, ChatPoller, ContentApi, DraftStore, Reconciler};
use inkstone_logging::{ink_debug, ink_warn};

use crate::commands::{Command, Field, HELP};
use crate::render::{render_chat, render_editor, render_view};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Turns commands into messages and renders the resulting view.
pub struct Shell<S, A> {
    reconciler: Reconciler<S, A>,
    chat: ChatPoller<A>,
    author: String,
}

impl<S, A> Shell<S, A>
where
    S: DraftStore,
    A: ContentApi + ChatApi,
{
    pub fn new(store: Arc<S>, api: Arc<A>, author: impl Into<String>) -> Self {
        Self {
            reconciler: Reconciler::new(store, Arc::clone(&api)),
            chat: ChatPoller::new(api),
            author: author.into(),
        }
    }

    pub async fn start(&mut self) -> String {
        if let Err(err) = self.reconciler.initialize().await {
            ink_warn!("Continuing without local drafts: {err}");
        }
        self.render()
    }

    pub async fn handle(&mut self, command: Command) -> (Flow, String) {
        let msg = match command {
            Command::Quit => return (Flow::Quit, String::new()),
            Command::Help => return (Flow::Continue, HELP.to_string()),
            Command::Chat => return (Flow::Continue, self.poll_chat().await),
            Command::Refresh => Msg::RefreshRequested,
            Command::More => Msg::LoadMoreRequested,
            Command::Search(term) => Msg::SearchChanged(term),
            Command::New => Msg::NewPoemClicked {
                author: self.author.clone(),
            },
            Command::Edit(id) => {
                if self.reconciler.state().list().find(&id).is_none() {
                    return (Flow::Continue, format!("{id} is not in the list"));
                }
                Msg::EditRequested(id)
            }
            Command::Set(field, text) => match self.edited_fields() {
                Some(mut fields) => {
                    *field_mut(&mut fields, field) = text;
                    Msg::FieldsChanged(fields)
                }
                None => return (Flow::Continue, "no poem is open".to_string()),
            },
            Command::Line(text) => match self.edited_fields() {
                Some(mut fields) => {
                    if !fields.content.is_empty() {
                        fields.content.push('\n');
                    }
                    fields.content.push_str(&text);
                    Msg::FieldsChanged(fields)
                }
                None => return (Flow::Continue, "no poem is open".to_string()),
            },
            Command::Save => Msg::SaveDraftClicked(now_stamp()),
            Command::Publish => Msg::PublishClicked(now_stamp()),
            Command::Update => Msg::UpdateClicked(now_stamp()),
            Command::Withdraw => Msg::WithdrawClicked(now_stamp()),
            Command::Discard(id) => Msg::DiscardClicked(id),
            Command::Close => Msg::EditorClosed,
            Command::Dismiss => Msg::NoticeDismissed,
        };

        let changed = self.reconciler.dispatch(msg).await;
        ink_debug!("Command handled, changed={changed}");
        (Flow::Continue, self.render())
    }

    fn edited_fields(&self) -> Option<PoemFields> {
        self.reconciler
            .state()
            .editor()
            .map(|session| session.fields.clone())
    }

    async fn poll_chat(&mut self) -> String {
        match self.chat.poll().await {
            Ok(_) => render_chat(self.chat.feed()),
            Err(err) => {
                ink_warn!("Chat poll failed: {err}");
                format!("chat unavailable: {err}")
            }
        }
    }

    fn render(&self) -> String {
        let mut out = render_view(&self.reconciler.view());
        if let Some(session) = self.reconciler.state().editor() {
            out.push_str(&render_editor(session));
        }
        out
    }
}

fn field_mut(fields: &mut PoemFields, field: Field) -> &mut String {
    match field {
        Field::Title => &mut fields.title,
        Field::Kind => &mut fields.kind,
        Field::Content => &mut fields.content,
        Field::Date => &mut fields.date,
    }
}

fn now_stamp() -> Stamp {
    let now = Local::now();
    Stamp {
        epoch_millis: now.timestamp_millis(),
        local_iso: now.format("%Y-%m-%dT%H:%M").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use inkstone_core::{ChatMessage, ItemId, PublishedItem};
    use inkstone_engine::{ApiError, MemoryDraftStore, PageQuery};

    use super::*;
    use crate::commands::parse_command;

    #[derive(Default)]
    struct FakeApi {
        poems: Mutex<Vec<PublishedItem>>,
    }

    #[async_trait::async_trait]
    impl ContentApi for FakeApi {
        async fn list(&self, _query: &PageQuery) -> Result<Vec<PublishedItem>, ApiError> {
            Ok(self.poems.lock().unwrap().clone())
        }

        async fn create(&self, fields: &PoemFields) -> Result<PublishedItem, ApiError> {
            let mut poems = self.poems.lock().unwrap();
            let item = PublishedItem {
                id: poems.len() as u64 + 1,
                fields: fields.clone(),
                author_id: None,
            };
            poems.push(item.clone());
            Ok(item)
        }

        async fn update(&self, _id: u64, _fields: &PoemFields) -> Result<(), ApiError> {
            Ok(())
        }

        async fn delete(&self, id: u64) -> Result<(), ApiError> {
            self.poems.lock().unwrap().retain(|poem| poem.id != id);
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl ChatApi for FakeApi {
        async fn messages_after(&self, _after_id: u64) -> Result<Vec<ChatMessage>, ApiError> {
            Ok(Vec::new())
        }
    }

    async fn run(shell: &mut Shell<MemoryDraftStore, FakeApi>, line: &str) -> String {
        let command = parse_command(line).expect("valid command");
        shell.handle(command).await.1
    }

    #[tokio::test]
    async fn typed_poem_is_saved_then_published() {
        let store = Arc::new(MemoryDraftStore::new());
        let api = Arc::new(FakeApi::default());
        let mut shell = Shell::new(Arc::clone(&store), Arc::clone(&api), "Li");
        shell.start().await;

        run(&mut shell, "new").await;
        run(&mut shell, "title Night rain").await;
        run(&mut shell, "line the roof speaks").await;
        let saved = run(&mut shell, "save").await;
        assert!(saved.contains("save draft done"), "{saved}");

        let drafts = store.get_all().await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].fields.content, "the roof speaks");
        assert_eq!(drafts[0].fields.author, "Li");

        run(&mut shell, &format!("edit {}", drafts[0].id)).await;
        let published = run(&mut shell, "publish").await;
        assert!(published.contains("publish done"), "{published}");
        assert!(store.get_all().await.unwrap().is_empty());
        assert_eq!(
            shell.reconciler.view().items[0].id,
            ItemId::Remote(1)
        );
    }

    #[tokio::test]
    async fn field_commands_need_an_open_poem() {
        let mut shell = Shell::new(
            Arc::new(MemoryDraftStore::new()),
            Arc::new(FakeApi::default()),
            "Li",
        );
        shell.start().await;

        assert_eq!(run(&mut shell, "title Lost").await, "no poem is open");
        assert_eq!(run(&mut shell, "edit 5").await, "5 is not in the list");
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let mut shell = Shell::new(
            Arc::new(MemoryDraftStore::new()),
            Arc::new(FakeApi::default()),
            "Li",
        );
        let (flow, _) = shell.handle(Command::Quit).await;
        assert_eq!(flow, Flow::Quit);
    }
}

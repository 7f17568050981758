use inkstone_core::ItemId;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    More,
    /// Empty term clears the filter.
    Search(String),
    New,
    Edit(ItemId),
    Set(Field, String),
    /// Adds one line to the poem body.
    Line(String),
    Save,
    Publish,
    Update,
    Withdraw,
    Discard(ItemId),
    Close,
    Dismiss,
    Chat,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Kind,
    Content,
    Date,
}

pub const HELP: &str = "\
commands:
  list                 reload the first page (drafts first)
  more                 load the next page
  search <term>        filter server poems; `search` alone clears
  new                  start a new poem
  edit <id>            edit a draft (draft_...) or a published poem (number)
  title|type|date|content <text>
                       set a field of the open poem
  line <text>          append a line to the poem body
  save                 save the open poem as a local draft
  publish              publish the open draft or new poem
  update               send changes of the open published poem
  withdraw             move the open published poem back to drafts
  discard <id>         delete a draft or a published poem
  close                close the editor
  dismiss              clear the last notice
  chat                 poll the chat room
  help | quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "list" | "refresh" => Command::Refresh,
        "more" => Command::More,
        "search" => Command::Search(rest.to_string()),
        "new" => Command::New,
        "edit" => Command::Edit(parse_id(rest)?),
        "title" => Command::Set(Field::Title, rest.to_string()),
        "type" => Command::Set(Field::Kind, rest.to_string()),
        "content" => Command::Set(Field::Content, rest.to_string()),
        "date" => Command::Set(Field::Date, rest.to_string()),
        "line" => Command::Line(rest.to_string()),
        "save" => Command::Save,
        "publish" => Command::Publish,
        "update" => Command::Update,
        "withdraw" => Command::Withdraw,
        "discard" | "delete" => Command::Discard(parse_id(rest)?),
        "close" => Command::Close,
        "dismiss" => Command::Dismiss,
        "chat" => Command::Chat,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "" => return Err("empty command".to_string()),
        other => return Err(format!("unknown command `{other}`, try `help`")),
    };
    Ok(command)
}

fn parse_id(text: &str) -> Result<ItemId, String> {
    text.parse::<ItemId>()
        .map_err(|err| format!("expected an item id: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstone_core::DraftId;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_keep_their_origin() {
        assert_eq!(parse_command("edit 42"), Ok(Command::Edit(ItemId::Remote(42))));
        assert_eq!(
            parse_command("discard draft_1700"),
            Ok(Command::Discard(ItemId::Local(DraftId::new("draft_1700"))))
        );
        assert!(parse_command("edit").is_err());
    }

    #[test]
    fn field_text_keeps_inner_spaces() {
        assert_eq!(
            parse_command("  title   Night  rain "),
            Ok(Command::Set(Field::Title, "Night  rain".to_string()))
        );
        assert_eq!(parse_command("search"), Ok(Command::Search(String::new())));
    }

    #[test]
    fn unknown_words_are_rejected() {
        assert!(parse_command("fly").is_err());
        assert!(parse_command("   ").is_err());
    }
}

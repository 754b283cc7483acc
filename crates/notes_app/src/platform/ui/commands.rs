//! Line-oriented command language for the terminal front end.
use std::path::Path;

use notes_core::{Emphasis, Mode, Msg, Tab, Timestamp};

pub const HELP: &str = "\
/topic add | fav <id> | archive <id> | del <id> | use <id> | rename <id> <title> | export <id>
/tag add <name> | rm <name> | toggle <name>
/session fav <id> | del <id> | copy <id>
/mode note|search|qa      /auto on|off      /tab current|archived|tags
/agent pick <file> | recent <file>          /team pick <file> | recent <file>
/feed copy | bold | italic
/draft <text>   set the input without submitting
/stage          stage the input, or commit what is staged
/show  /help  /quit
Any other line is submitted as a note.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Show,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str, now: Timestamp) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Dispatch(vec![
            Msg::InputChanged(line.to_string()),
            Msg::Submit { now },
        ])));
    };

    let (head, args) = split_word(rest);
    let one = |msg: Msg| -> Result<Option<Command>, String> {
        Ok(Some(Command::Dispatch(vec![msg])))
    };
    match head {
        "topic" => parse_topic(args).and_then(one),
        "tag" => {
            let (verb, name) = split_word(args);
            let name = required(name, "tag name")?;
            match verb {
                "add" => one(Msg::AddTag(name)),
                "rm" => one(Msg::RemoveTag(name)),
                "toggle" => one(Msg::ToggleTagSelection(name)),
                _ => Err(format!("unknown tag command: {verb}")),
            }
        }
        "session" => {
            let (verb, id) = split_word(args);
            let id = required(id, "session id")?;
            match verb {
                "fav" => one(Msg::ToggleSessionFavorite(id)),
                "del" => one(Msg::DeleteSession(id)),
                "copy" => one(Msg::CopySession(id)),
                _ => Err(format!("unknown session command: {verb}")),
            }
        }
        "mode" => match Mode::parse(args) {
            Some(mode) => one(Msg::SetMode(mode)),
            None => Err(format!("unknown mode: {args}")),
        },
        "auto" => match args {
            "on" => one(Msg::SetAutoMode(true)),
            "off" => one(Msg::SetAutoMode(false)),
            _ => Err("usage: /auto on|off".to_string()),
        },
        "tab" => match Tab::parse(args) {
            Some(tab) => one(Msg::SetTab(tab)),
            None => Err(format!("unknown tab: {args}")),
        },
        "agent" => {
            let (verb, path) = split_word(args);
            let path = required(path, "agent file")?;
            match verb {
                "pick" => one(Msg::PickAgent {
                    name: display_name(&path),
                    path,
                }),
                "recent" => one(Msg::ChooseRecentAgent { path }),
                _ => Err(format!("unknown agent command: {verb}")),
            }
        }
        "team" => {
            let (verb, path) = split_word(args);
            let path = required(path, "team file")?;
            match verb {
                "pick" => one(Msg::PickTeam {
                    name: display_name(&path),
                    path,
                    now,
                }),
                "recent" => one(Msg::ChooseRecentTeam { path }),
                _ => Err(format!("unknown team command: {verb}")),
            }
        }
        "feed" => match args {
            "copy" => one(Msg::CopyFeed),
            "bold" => one(Msg::EmphasizeLatest(Emphasis::Bold)),
            "italic" => one(Msg::EmphasizeLatest(Emphasis::Italic)),
            _ => Err("usage: /feed copy|bold|italic".to_string()),
        },
        // The draft keeps inner whitespace as typed.
        "draft" => one(Msg::InputChanged(args.to_string())),
        "stage" => one(Msg::AdvanceStage { now }),
        "show" => Ok(Some(Command::Show)),
        "help" => Ok(Some(Command::Help)),
        "quit" | "exit" => Ok(Some(Command::Quit)),
        _ => Err(format!("unknown command: /{head} (try /help)")),
    }
}

fn parse_topic(args: &str) -> Result<Msg, String> {
    let (verb, rest) = split_word(args);
    if verb == "add" {
        return Ok(Msg::AddTopic);
    }
    let (id, title) = split_word(rest);
    let id = required(id, "topic id")?;
    match verb {
        "fav" => Ok(Msg::ToggleTopicFavorite(id)),
        "archive" => Ok(Msg::ToggleTopicArchive(id)),
        "del" => Ok(Msg::DeleteTopic(id)),
        "use" => Ok(Msg::SetActiveTopic(id)),
        "export" => Ok(Msg::ExportTopic(id)),
        "rename" => Ok(Msg::RenameTopic {
            id,
            title: title.to_string(),
        }),
        _ => Err(format!("unknown topic command: {verb}")),
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    }
}

fn required(value: &str, what: &str) -> Result<String, String> {
    if value.is_empty() {
        Err(format!("missing {what}"))
    } else {
        Ok(value.to_string())
    }
}

/// File name shown in pickers and the feed.
fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

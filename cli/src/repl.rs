//! Line parsing for the interactive `chat` session.

/// What one line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Send(String),
    New,
    List,
    Switch(String),
    Clear,
    ClearAll,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub const HELP: &str = "\
/new            start a new conversation
/list           list conversations
/switch <n|id>  switch by list number or id prefix
/clear          clear the current conversation
/clear-all      delete every conversation
/help           show this help
/quit           leave";

#[must_use]
pub fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ReplCommand::Send(line.trim_end_matches(['\r', '\n']).to_owned());
    };

    let (name, arg) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(name, arg)| (name, arg.trim()));
    match name {
        "new" => ReplCommand::New,
        "list" | "ls" => ReplCommand::List,
        "switch" | "s" if !arg.is_empty() => ReplCommand::Switch(arg.to_owned()),
        "clear" => ReplCommand::Clear,
        "clear-all" => ReplCommand::ClearAll,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(trimmed.to_owned()),
    }
}

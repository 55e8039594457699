//! Parsing for the slash commands accepted by the debate REPL.
use crate::debate::Slot;

pub const HELP: &str = "Commands:
  <text>                          start a debate on <text>, or add your opinion after one finishes
  /persona a|b                    show a persona
  /persona a|b name <value>       rename a persona
  /persona a|b prompt <value>     replace a persona's system prompt (use \\n for new lines)
  /persona a|b model <value>      set a persona's model by label or id
  /persona a|b reset              restore a persona's defaults
  /rounds <n>                     set the number of rounds (1-10)
  /settings                       show the current settings
  /models                         list known models
  /new                            discard the finished debate and pick a new topic
  /help                           show this message
  /quit                           exit
Press Ctrl-C during a debate to stop it after the current turn.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersonaField {
    Name,
    Prompt,
    Model,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplCommand {
    /// Free text: a topic or an opinion depending on the session
    Text(String),
    ShowPersona(Slot),
    EditPersona {
        slot: Slot,
        field: PersonaField,
        value: String,
    },
    ResetPersona(Slot),
    Rounds(usize),
    Settings,
    Models,
    New,
    Help,
    Quit,
    Empty,
    /// A slash command that couldn't be parsed, with a message for
    /// the user
    Invalid(String),
}

fn parse_slot(s: &str) -> Option<Slot> {
    match s.to_ascii_lowercase().as_str() {
        "a" => Some(Slot::A),
        "b" => Some(Slot::B),
        _ => None,
    }
}

fn parse_persona(args: &str) -> ReplCommand {
    let usage = "Usage: /persona a|b [name|prompt|model <value> | reset]";
    let mut parts = args.splitn(3, char::is_whitespace);
    let Some(slot) = parts.next().and_then(parse_slot) else {
        return ReplCommand::Invalid(usage.to_string());
    };

    let field = match parts.next().map(|f| f.to_ascii_lowercase()) {
        None => return ReplCommand::ShowPersona(slot),
        Some(f) if f == "reset" => return ReplCommand::ResetPersona(slot),
        Some(f) if f == "name" => PersonaField::Name,
        Some(f) if f == "prompt" => PersonaField::Prompt,
        Some(f) if f == "model" => PersonaField::Model,
        Some(_) => return ReplCommand::Invalid(usage.to_string()),
    };

    let value = parts.next().map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return ReplCommand::Invalid(usage.to_string());
    }
    let value = match field {
        PersonaField::Prompt => value.replace("\\n", "\n"),
        _ => value.to_string(),
    };

    ReplCommand::EditPersona { slot, field, value }
}

pub fn parse(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ReplCommand::Text(line.to_string());
    };

    let (name, args) = command
        .split_once(char::is_whitespace)
        .map(|(name, args)| (name, args.trim()))
        .unwrap_or((command, ""));

    match name.to_ascii_lowercase().as_str() {
        "persona" => parse_persona(args),
        "rounds" => match args.parse::<usize>() {
            Ok(n) => ReplCommand::Rounds(n),
            Err(_) => ReplCommand::Invalid("Usage: /rounds <n>".to_string()),
        },
        "settings" => ReplCommand::Settings,
        "models" => ReplCommand::Models,
        "new" => ReplCommand::New,
        "help" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => ReplCommand::Invalid(format!(
            "Unknown command /{}. Type /help for a list of commands.",
            other
        )),
    }
}

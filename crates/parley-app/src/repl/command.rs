//! Parsing of REPL input lines.

use parley_common::ModelVariant;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text to send.
    Send(String),
    /// `/image <path|data-url>`
    Image(String),
    /// `/detach`
    Detach,
    /// `/model` toggles between variants, `/model <variant>` switches.
    Model(Option<ModelVariant>),
    /// `/clear`
    Clear,
    /// `/help`
    Help,
    /// `/quit` or `/exit`
    Quit,
    /// Malformed or unknown command, with a message for the user.
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Send(line.to_string());
        };
        // "//text" sends a message that starts with a slash
        if rest.starts_with('/') {
            return Command::Send(rest.to_string());
        }

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "image" | "img" if arg.is_empty() => {
                Command::Invalid("usage: /image <path or data URL>".into())
            }
            "image" | "img" => Command::Image(arg.to_string()),
            "detach" => Command::Detach,
            "model" if arg.is_empty() => Command::Model(None),
            "model" => match arg.parse::<ModelVariant>() {
                Ok(variant) => Command::Model(Some(variant)),
                Err(e) => Command::Invalid(e),
            },
            "clear" | "new" => Command::Clear,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Invalid(format!("unknown command /{other}, try /help")),
        }
    }
}

pub const HELP: &str = "\
Commands:
  /image <path>     attach an image to the next message (or a data: URL)
  /detach           drop the attached image
  /model [variant]  switch the model (flash, pro); no argument toggles
  /clear            start a new conversation
  /help             show this help
  /quit             exit (also Ctrl-D)
Ctrl-C stops a reply while it is streaming.
Start a message with // to send text beginning with a slash.";

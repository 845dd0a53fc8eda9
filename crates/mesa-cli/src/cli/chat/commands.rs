//! Slash commands available in the chat loop.

use std::io::Write;

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Clear the conversation and start a new session.
    Reset,
    History,
    /// Show the current session id.
    Session,
    /// Switch to another restaurant.
    Restaurant { id: String, name: Option<String> },
    Exit,
    /// Unknown command or bad arguments; carries the message to show.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/reset" | "/new" => ChatCommand::Reset,
        "/history" => ChatCommand::History,
        "/session" => ChatCommand::Session,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/restaurant" | "/r" => match arg.split_once(char::is_whitespace) {
            _ if arg.is_empty() => {
                ChatCommand::Unknown("/restaurant requires an id".to_string())
            }
            Some((id, name)) => ChatCommand::Restaurant {
                id: id.to_string(),
                name: Some(name.trim().to_string()),
            },
            None => ChatCommand::Restaurant {
                id: arg.to_string(),
                name: None,
            },
        },
        other => ChatCommand::Unknown(format!("Unknown command: {other}")),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help(out: &mut impl Write) -> std::io::Result<()> {
    let rows = [
        ("/help", "Show this help message"),
        ("/reset", "Clear the conversation and start a new session"),
        ("/history", "Show the messages kept for context"),
        ("/session", "Show the current session id"),
        ("/restaurant <id> [name]", "Switch restaurant"),
        ("/exit", "End the chat"),
    ];

    writeln!(out)?;
    writeln!(out, "  {}", style("Available commands:").bold())?;
    writeln!(out)?;
    for (command, description) in rows {
        writeln!(out, "  {:<24} {}", style(command).cyan(), description)?;
    }
    writeln!(out)?;
    writeln!(out, "  {}", style("Ctrl+D to exit").dim())?;
    writeln!(out)
}

//! Async readline input for the chat loop.
//!
//! Wraps `rustyline_async::Readline` and classifies each submitted line as a
//! chat message or a slash command.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

use super::commands::{self, ChatCommand};

/// Events produced by the input handler.
#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// A line to send to the assistant, untrimmed.
    Message(String),
    Command(ChatCommand),
    /// Blank line.
    Empty,
    /// Ctrl+D.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

/// Classify one submitted line.
pub fn classify(line: String) -> InputEvent {
    if line.trim().is_empty() {
        return InputEvent::Empty;
    }
    match commands::parse(&line) {
        Some(command) => InputEvent::Command(command),
        None => InputEvent::Message(line),
    }
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Returns the input handler and a `SharedWriter` for printing without
    /// clobbering the prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    pub fn update_prompt(&mut self, prompt: &str) {
        let _ = self.rl.update_prompt(prompt);
    }

    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => classify(line),
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(_) => InputEvent::Eof,
        }
    }

    /// Restore the terminal before exit.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_message_keeps_text() {
        assert_eq!(
            classify("  Une table pour deux ?".to_string()),
            InputEvent::Message("  Une table pour deux ?".to_string())
        );
    }

    #[test]
    fn test_classify_blank_and_command() {
        assert_eq!(classify("   ".to_string()), InputEvent::Empty);
        assert_eq!(classify("/reset".to_string()), InputEvent::Command(ChatCommand::Reset));
    }
}

//! Terminal implementations of the chat surface's UI targets.
//!
//! Everything prints through a shared [`Console`] so output goes through the
//! readline `SharedWriter` and never clobbers the prompt. The terminal has
//! no markup: messages print as raw text, and user messages are not echoed
//! because readline already shows them.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use mesa_core::chat::format::RenderedMessage;
use mesa_core::chat::provider::{ContextProvider, SharedContext};
use mesa_core::chat::view::{
    EmptyStateView, InputField, MessageNode, StatusView, SurfaceTargets, ThreadView, TypingIndicator,
};
use mesa_types::chat::ChatRole;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Shared, cloneable output handle.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
        }
    }

    /// Print one line. Output errors are ignored: there is nowhere to report them.
    pub fn line(&self, text: impl Display) {
        let mut out = lock(&*self.out);
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }

    fn raw(&self, text: &str) {
        let mut out = lock(&*self.out);
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl Write for Console {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&*self.out).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        lock(&*self.out).flush()
    }
}

#[derive(Default)]
struct NodeState {
    started: bool,
    printed_chars: usize,
}

/// One message. Prints only the part of the text not yet on screen, so a
/// progressive reveal appears as a growing line.
pub struct TerminalNode {
    console: Console,
    /// `None` for messages that must not be printed.
    label: Option<String>,
    state: Mutex<NodeState>,
}

impl TerminalNode {
    fn print(&self, text: &str, finish: bool) {
        let Some(label) = &self.label else {
            return;
        };
        let mut state = lock(&self.state);

        let mut chunk = String::new();
        if !state.started {
            chunk.push_str(&format!("  {} ", style(format!("{label} >")).cyan().bold()));
            state.started = true;
        }
        chunk.extend(text.chars().skip(state.printed_chars));
        state.printed_chars = state.printed_chars.max(text.chars().count());
        if finish {
            chunk.push('\n');
        }
        self.console.raw(&chunk);
    }
}

impl MessageNode for TerminalNode {
    fn set_text(&self, text: &str) {
        self.print(text, false);
    }

    fn set_formatted(&self, message: &RenderedMessage) {
        self.print(&message.raw, true);
    }

    fn clear(&self) {
        *lock(&self.state) = NodeState::default();
    }
}

/// The message thread. Assistant messages are labelled with the restaurant name.
pub struct TerminalThread {
    console: Console,
    context: SharedContext,
}

impl ThreadView for TerminalThread {
    fn append(&self, role: ChatRole) -> Arc<dyn MessageNode> {
        let label = match role {
            ChatRole::Assistant => Some(self.context.context().display_name().to_string()),
            ChatRole::User => None,
        };
        Arc::new(TerminalNode {
            console: self.console.clone(),
            label,
            state: Mutex::new(NodeState::default()),
        })
    }

    fn clear(&self) {
        self.console
            .line(format!("  {}", style("--- conversation cleared ---").dim()));
    }
}

/// `indicatif` spinner shown while waiting for a reply.
pub struct TerminalTyping {
    enabled: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalTyping {
    /// A disabled indicator tracks nothing on screen (quiet mode).
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            spinner: Mutex::new(None),
        }
    }

    pub fn is_spinning(&self) -> bool {
        lock(&self.spinner).is_some()
    }
}

impl TypingIndicator for TerminalTyping {
    fn set_visible(&self, visible: bool) {
        let mut slot = lock(&self.spinner);
        if !visible {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
            return;
        }
        if !self.enabled || slot.is_some() {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.set_message("typing...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        *slot = Some(spinner);
    }
}

/// Dimmed status line. Repeated statuses print once.
pub struct TerminalStatus {
    console: Console,
    last: Mutex<String>,
}

impl StatusView for TerminalStatus {
    fn set_status(&self, status: &str) {
        let mut last = lock(&self.last);
        if *last == status {
            return;
        }
        *last = status.to_string();
        if !status.is_empty() {
            self.console.line(format!("  {}", style(status).dim()));
        }
    }
}

/// Hint printed when the thread becomes empty.
pub struct TerminalEmptyState {
    console: Console,
    visible: Mutex<bool>,
    text: Mutex<String>,
}

impl EmptyStateView for TerminalEmptyState {
    fn set_visible(&self, visible: bool) {
        let mut current = lock(&self.visible);
        if visible && !*current {
            let text = lock(&self.text).clone();
            if !text.is_empty() {
                self.console.line(format!("  {}", style(text).dim().italic()));
            }
        }
        *current = visible;
    }

    fn set_text(&self, text: &str) {
        *lock(&self.text) = text.to_string();
    }
}

#[derive(Default)]
struct InputState {
    enabled: bool,
    placeholder: String,
}

/// Readline owns the actual line editor; this records what the surface
/// wants the input to look like so the loop can reflect it in the prompt.
#[derive(Default)]
pub struct TerminalInput {
    state: Mutex<InputState>,
}

impl TerminalInput {
    pub fn is_enabled(&self) -> bool {
        lock(&self.state).enabled
    }

    pub fn placeholder(&self) -> String {
        lock(&self.state).placeholder.clone()
    }
}

impl InputField for TerminalInput {
    /// Lines are passed to `send` directly, never read back.
    fn value(&self) -> String {
        String::new()
    }

    fn clear(&self) {}

    fn set_enabled(&self, enabled: bool) {
        lock(&self.state).enabled = enabled;
    }

    fn set_placeholder(&self, placeholder: &str) {
        lock(&self.state).placeholder = placeholder.to_string();
    }

    fn focus(&self) {}
}

/// The terminal targets, kept as concrete types so the loop can query them.
pub struct TerminalViews {
    pub thread: Arc<TerminalThread>,
    pub typing: Arc<TerminalTyping>,
    pub status: Arc<TerminalStatus>,
    pub empty_state: Arc<TerminalEmptyState>,
    pub input: Arc<TerminalInput>,
}

impl TerminalViews {
    pub fn new(console: Console, context: SharedContext, spinner: bool) -> Self {
        Self {
            thread: Arc::new(TerminalThread {
                console: console.clone(),
                context,
            }),
            typing: Arc::new(TerminalTyping::new(spinner)),
            status: Arc::new(TerminalStatus {
                console: console.clone(),
                last: Mutex::new(String::new()),
            }),
            empty_state: Arc::new(TerminalEmptyState {
                console,
                visible: Mutex::new(false),
                text: Mutex::new(String::new()),
            }),
            input: Arc::new(TerminalInput::default()),
        }
    }

    /// There is no send button in a terminal.
    pub fn targets(&self) -> SurfaceTargets {
        SurfaceTargets {
            thread: Some(self.thread.clone()),
            empty_state: Some(self.empty_state.clone()),
            typing: Some(self.typing.clone()),
            input: Some(self.input.clone()),
            send_control: None,
            status: Some(self.status.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use mesa_types::chat::ChatContext;

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn text(&self) -> String {
            console::strip_ansi_codes(&String::from_utf8(self.0.lock().unwrap().clone()).unwrap())
                .to_string()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn views() -> (TerminalViews, Buffer) {
        let buffer = Buffer::default();
        let context = SharedContext::new(ChatContext::new("r1", "Chez Luigi"));
        (TerminalViews::new(Console::new(buffer.clone()), context, false), buffer)
    }

    #[test]
    fn test_streamed_reply_prints_growing_line() {
        let (views, buffer) = views();
        let node = views.thread.append(ChatRole::Assistant);
        node.set_text("Bons");
        node.set_text("Bonsoir!");
        node.set_formatted(&RenderedMessage::from_raw("Bonsoir!"));
        assert_eq!(buffer.text(), "  Chez Luigi > Bonsoir!\n");
    }

    #[test]
    fn test_user_messages_not_echoed() {
        let (views, buffer) = views();
        views
            .thread
            .append(ChatRole::User)
            .set_formatted(&RenderedMessage::from_raw("Bonjour"));
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_status_prints_changes_only() {
        let (views, buffer) = views();
        views.status.set_status("Sending…");
        views.status.set_status("Sending…");
        views.status.set_status("");
        views.status.set_status("Reply received.");
        assert_eq!(buffer.text(), "  Sending…\n  Reply received.\n");
    }

    #[test]
    fn test_empty_state_hint_printed_on_transition() {
        let (views, buffer) = views();
        views.empty_state.set_text("Start a conversation with Chez Luigi.");
        views.empty_state.set_visible(true);
        views.empty_state.set_visible(true);
        views.empty_state.set_visible(false);
        views.empty_state.set_visible(true);
        assert_eq!(buffer.text().matches("Start a conversation").count(), 2);
    }

    #[test]
    fn test_disabled_typing_never_spins() {
        let (views, _) = views();
        views.typing.set_visible(true);
        assert!(!views.typing.is_spinning());
        views.typing.set_visible(false);
    }

    #[test]
    fn test_input_records_surface_state() {
        let (views, _) = views();
        views.input.set_enabled(false);
        views.input.set_placeholder("Select a restaurant to start chatting.");
        assert!(!views.input.is_enabled());
        assert_eq!(views.input.placeholder(), "Select a restaurant to start chatting.");
        assert!(views.targets().send_control.is_none());
    }
}

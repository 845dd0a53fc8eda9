//! UI target traits the chat surface writes to.
//!
//! Every target is optional. The surface holds `Option<Arc<dyn ...>>` for
//! each one and skips the write when a target is missing, so a surface with
//! no targets at all runs headless.

use std::sync::Arc;

use mesa_types::chat::ChatRole;

use super::format::RenderedMessage;

/// One rendered message in the thread.
pub trait MessageNode: Send + Sync {
    /// Replace the content with plain, unformatted text.
    fn set_text(&self, text: &str);

    /// Replace the content with the final formatted message.
    fn set_formatted(&self, message: &RenderedMessage);

    fn clear(&self);
}

/// The scrolling list of messages.
pub trait ThreadView: Send + Sync {
    /// Append an empty message node for `role` and return it.
    fn append(&self, role: ChatRole) -> Arc<dyn MessageNode>;

    /// Remove every rendered message.
    fn clear(&self);
}

/// Shown while the thread is empty.
pub trait EmptyStateView: Send + Sync {
    fn set_visible(&self, visible: bool);
    fn set_text(&self, text: &str);
}

/// "Assistant is typing" indicator.
pub trait TypingIndicator: Send + Sync {
    fn set_visible(&self, visible: bool);
}

/// The message input field.
pub trait InputField: Send + Sync {
    fn value(&self) -> String;
    fn clear(&self);
    fn set_enabled(&self, enabled: bool);
    fn set_placeholder(&self, placeholder: &str);
    fn focus(&self);
}

/// The send button.
pub trait SendControl: Send + Sync {
    fn set_enabled(&self, enabled: bool);
}

/// Single-line status text. An empty string clears it.
pub trait StatusView: Send + Sync {
    fn set_status(&self, status: &str);
}

/// The set of targets a surface renders into.
#[derive(Clone, Default)]
pub struct SurfaceTargets {
    pub thread: Option<Arc<dyn ThreadView>>,
    pub empty_state: Option<Arc<dyn EmptyStateView>>,
    pub typing: Option<Arc<dyn TypingIndicator>>,
    pub input: Option<Arc<dyn InputField>>,
    pub send_control: Option<Arc<dyn SendControl>>,
    pub status: Option<Arc<dyn StatusView>>,
}

impl SurfaceTargets {
    /// No targets: every UI write is a no-op.
    pub fn headless() -> Self {
        Self::default()
    }
}

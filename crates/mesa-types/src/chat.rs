//! Conversation entry and restaurant context types for Mesa.
//!
//! These types model one chat thread scoped to a restaurant: who said what,
//! in which order, and which restaurant the thread currently talks about.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Author of a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for ChatRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ChatRole::User),
            "assistant" => Ok(ChatRole::Assistant),
            other => Err(format!("invalid chat role: '{other}'")),
        }
    }
}

/// A single message in a conversation.
///
/// Content is never blank: use [`ConversationEntry::new`] which rejects
/// empty or whitespace-only text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: ChatRole,
    pub content: String,
}

impl ConversationEntry {
    /// Build an entry, returning `None` when `content` is blank.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return None;
        }
        Some(Self { role, content })
    }

    pub fn user(content: impl Into<String>) -> Option<Self> {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Option<Self> {
        Self::new(ChatRole::Assistant, content)
    }
}

/// The restaurant a chat thread is scoped to.
///
/// `restaurant_id` is `None` until the dashboard has a restaurant selected;
/// a surface without an id keeps its controls disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    pub restaurant_id: Option<String>,
    pub restaurant_name: String,
}

impl ChatContext {
    pub fn new(restaurant_id: impl Into<String>, restaurant_name: impl Into<String>) -> Self {
        Self {
            restaurant_id: Some(restaurant_id.into()),
            restaurant_name: restaurant_name.into(),
        }
    }

    /// A context with no restaurant selected.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The restaurant id, if it is present and not blank.
    pub fn identity(&self) -> Option<&str> {
        self.restaurant_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn has_identity(&self) -> bool {
        self.identity().is_some()
    }

    /// Display name, falling back to a generic label when none is set.
    pub fn display_name(&self) -> &str {
        let name = self.restaurant_name.trim();
        if name.is_empty() { "Restaurant" } else { name }
    }
}

/// Snapshot of the surface's send gate, passed to state-change hooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendState {
    pub is_sending: bool,
    pub has_interacted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_role_roundtrip() {
        for role in [ChatRole::User, ChatRole::Assistant] {
            let s = role.to_string();
            let parsed: ChatRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
        assert!("system".parse::<ChatRole>().is_err());
    }

    #[test]
    fn test_chat_role_serde() {
        let json = serde_json::to_string(&ChatRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_entry_rejects_blank_content() {
        assert!(ConversationEntry::user("").is_none());
        assert!(ConversationEntry::assistant("   \n").is_none());
        let entry = ConversationEntry::user("Bonjour").unwrap();
        assert_eq!(entry.role, ChatRole::User);
        assert_eq!(entry.content, "Bonjour");
    }

    #[test]
    fn test_entry_serializes_wire_shape() {
        let entry = ConversationEntry::user("Menu?").unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "Menu?"}));
    }

    #[test]
    fn test_context_identity() {
        assert!(!ChatContext::empty().has_identity());
        let blank = ChatContext {
            restaurant_id: Some("  ".to_string()),
            restaurant_name: "Chez Luigi".to_string(),
        };
        assert!(!blank.has_identity());
        let ctx = ChatContext::new("r1", "Chez Luigi");
        assert_eq!(ctx.identity(), Some("r1"));
    }

    #[test]
    fn test_context_display_name_fallback() {
        assert_eq!(ChatContext::empty().display_name(), "Restaurant");
        assert_eq!(ChatContext::new("r1", "Chez Luigi").display_name(), "Chez Luigi");
    }
}

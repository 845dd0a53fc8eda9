//! Bounded conversation history.
//!
//! Holds at most `2 × history_limit` entries (one user and one assistant
//! entry per turn). Pushing past the bound evicts the oldest entries first.

use mesa_types::chat::ConversationEntry;

#[derive(Debug, Clone)]
pub struct ConversationHistory {
    entries: Vec<ConversationEntry>,
    history_limit: usize,
}

impl ConversationHistory {
    /// Create an empty history. A limit of 0 is raised to 1.
    pub fn new(history_limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            history_limit: history_limit.max(1),
        }
    }

    /// Create a history pre-filled with `entries`, trimmed to the bound.
    pub fn with_entries(
        history_limit: usize,
        entries: impl IntoIterator<Item = ConversationEntry>,
    ) -> Self {
        let mut history = Self::new(history_limit);
        history.entries.extend(entries);
        history.trim();
        history
    }

    /// Maximum number of retained entries.
    pub fn bound(&self) -> usize {
        self.history_limit * 2
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Append an entry and evict from the front if the bound is exceeded.
    pub fn push(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
        self.trim();
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ConversationEntry> {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..].to_vec()
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn trim(&mut self) {
        let bound = self.bound();
        if self.entries.len() > bound {
            let excess = self.entries.len() - bound;
            self.entries.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(text: &str) -> ConversationEntry {
        ConversationEntry::user(text).unwrap()
    }

    fn assistant(text: &str) -> ConversationEntry {
        ConversationEntry::assistant(text).unwrap()
    }

    #[test]
    fn test_push_never_exceeds_bound() {
        let mut history = ConversationHistory::new(2);
        for i in 0..10 {
            history.push(user(&format!("q{i}")));
            history.push(assistant(&format!("a{i}")));
            assert!(history.len() <= 4);
        }
        let contents: Vec<&str> = history.entries().iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["q8", "a8", "q9", "a9"]);
    }

    #[test]
    fn test_recent_is_oldest_first() {
        let mut history = ConversationHistory::new(3);
        history.push(user("one"));
        history.push(assistant("two"));
        history.push(user("three"));

        let recent = history.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content, "two");
        assert_eq!(recent[1].content, "three");

        assert_eq!(history.recent(10).len(), 3);
        assert!(ConversationHistory::new(3).recent(3).is_empty());
    }

    #[test]
    fn test_with_entries_trims_initial_history() {
        let entries = (0..7).map(|i| user(&format!("m{i}")));
        let history = ConversationHistory::with_entries(2, entries);
        assert_eq!(history.len(), 4);
        assert_eq!(history.entries()[0].content, "m3");
    }

    #[test]
    fn test_zero_limit_is_raised() {
        let mut history = ConversationHistory::new(0);
        assert_eq!(history.history_limit(), 1);
        history.push(user("a"));
        history.push(assistant("b"));
        history.push(user("c"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut history = ConversationHistory::new(2);
        history.push(user("a"));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.bound(), 4);
    }
}

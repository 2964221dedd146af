//! Per-session conversation histories

use dashmap::DashMap;

use crate::types::Conversation;

/// Conversations keyed by session id
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Conversation>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of a session's history; empty if the session is unknown
    pub fn snapshot(&self, session: &str) -> Conversation {
        self.sessions
            .get(session)
            .map(|c| c.value().clone())
            .unwrap_or_default()
    }

    /// Append a question and its answer as one step
    pub fn record_exchange(&self, session: &str, question: &str, answer: &str) {
        self.sessions
            .entry(session.to_string())
            .or_default()
            .record_exchange(question, answer);
    }

    /// Forget one session. Returns the number of turns dropped.
    pub fn clear(&self, session: &str) -> usize {
        self.sessions
            .remove(session)
            .map(|(_, c)| c.len())
            .unwrap_or(0)
    }

    /// Forget every session
    pub fn clear_all(&self) {
        self.sessions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        store.record_exchange("alice", "q1", "a1");
        store.record_exchange("bob", "q2", "a2");
        store.record_exchange("alice", "q3", "a3");

        assert_eq!(store.snapshot("alice").len(), 4);
        assert_eq!(store.snapshot("bob").len(), 2);
        assert!(store.snapshot("carol").is_empty());

        assert_eq!(store.clear("alice"), 4);
        assert_eq!(store.clear("alice"), 0);
        assert_eq!(store.snapshot("bob").len(), 2);

        store.clear_all();
        assert!(store.snapshot("bob").is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = SessionStore::new();
        store.record_exchange("s", "q", "a");

        let mut copy = store.snapshot("s");
        copy.record_exchange("q2", "a2");
        assert_eq!(copy.len(), 4);
        assert_eq!(store.snapshot("s").len(), 2);
    }
}

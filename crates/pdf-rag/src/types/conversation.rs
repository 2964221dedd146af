//! Conversation history used to rewrite follow-up questions

use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Assistant,
}

impl Role {
    /// Speaker label used when rendering history into a prompt
    pub fn label(&self) -> &'static str {
        match self {
            Role::Human => "Human",
            Role::Assistant => "AI",
        }
    }
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Ordered, append-only log of prior turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answered question: the human turn, then the assistant turn
    pub fn record_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::Human,
            text: question.into(),
        });
        self.turns.push(Turn {
            role: Role::Assistant,
            text: answer.into(),
        });
    }

    /// All turns, oldest first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render as `Human: ...` / `AI: ...` lines
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.role.label(), t.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_exchange_order() {
        let mut conversation = Conversation::new();
        conversation.record_exchange("What is the capacity?", "500 units.");

        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.turns()[0].role, Role::Human);
        assert_eq!(conversation.turns()[1].role, Role::Assistant);
        assert_eq!(
            conversation.render(),
            "Human: What is the capacity?\nAI: 500 units."
        );
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let turn = Turn {
            role: Role::Assistant,
            text: "hi".into(),
        };
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "assistant");
    }
}

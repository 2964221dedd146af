//! Prompt templates for query rewriting and grounded answers

use crate::providers::vector_index::VectorSearchResult;
use crate::types::Conversation;

/// Instruction appended after the conversation when asking for a search query
pub const REWRITE_INSTRUCTION: &str = "Given the above conversation, generate a search query to lookup in order to get information relevant to the conversation";

/// System instruction for grounded answers
pub const SYSTEM_INSTRUCTION: &str = "You are a technical assistant good at searching documents. If the answer is not in the context, say \"I don't know the answer.\"";

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunk texts with blank lines, best match first
    pub fn build_context(results: &[VectorSearchResult]) -> String {
        results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Grounded answer prompt
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        format!(
            "<s> [INST] {instruction} [/INST] </s>\n[INST] {question}\nContext: {context}\nAnswer: [/INST]",
            instruction = SYSTEM_INSTRUCTION,
            question = question,
            context = context
        )
    }

    /// Prompt asking the model to turn a follow-up into a standalone search query
    pub fn build_rewrite_prompt(conversation: &Conversation, question: &str) -> String {
        format!(
            "{history}\nHuman: {question}\n{instruction}",
            history = conversation.render(),
            question = question,
            instruction = REWRITE_INSTRUCTION
        )
    }
}

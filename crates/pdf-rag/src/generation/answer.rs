//! History-aware question answering and direct chat

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::LlmProvider;
use crate::retrieval::Retriever;
use crate::types::{Conversation, QueryResult};

use super::prompt::PromptBuilder;

/// Rewrite, retrieve, generate
pub struct QueryPipeline {
    llm: Arc<dyn LlmProvider>,
    retriever: Retriever,
}

impl QueryPipeline {
    pub fn new(llm: Arc<dyn LlmProvider>, retriever: Retriever) -> Self {
        Self { llm, retriever }
    }

    /// Answer a question and record the exchange in `conversation`.
    ///
    /// The conversation is only changed when the answer was produced.
    pub async fn answer(&self, question: &str, conversation: &mut Conversation) -> Result<QueryResult> {
        let result = self.query(question, conversation).await?;
        conversation.record_exchange(question, result.answer.clone());
        Ok(result)
    }

    /// Answer a question against the given history without recording it
    pub async fn query(&self, question: &str, conversation: &Conversation) -> Result<QueryResult> {
        if question.trim().is_empty() {
            return Err(Error::BadRequest("query must not be empty".to_string()));
        }

        let search_query = self.rewrite(question, conversation).await?;
        let context = self.retriever.retrieve(&search_query).await?;

        let prompt = PromptBuilder::build_rag_prompt(question, &PromptBuilder::build_context(&context));
        let answer = self.llm.complete(&prompt).await?;

        tracing::info!(
            "Answered with {} model using {} context chunks",
            self.llm.model(),
            context.len()
        );

        Ok(QueryResult {
            answer,
            search_query,
            context,
        })
    }

    /// Standalone search query for a question. Without history the question is used as is.
    async fn rewrite(&self, question: &str, conversation: &Conversation) -> Result<String> {
        if conversation.is_empty() {
            return Ok(question.to_string());
        }

        let prompt = PromptBuilder::build_rewrite_prompt(conversation, question);
        let rewritten = self.llm.complete(&prompt).await?;
        let rewritten = rewritten.trim();

        if rewritten.is_empty() {
            tracing::warn!("Query rewrite returned nothing, searching with the question");
            return Ok(question.to_string());
        }

        tracing::debug!("Rewrote '{}' as '{}'", question, rewritten);
        Ok(rewritten.to_string())
    }

    /// Ungrounded chat: the message goes to the model verbatim
    pub async fn chat(&self, message: &str) -> Result<String> {
        if message.trim().is_empty() {
            return Err(Error::BadRequest("query must not be empty".to_string()));
        }
        self.llm.complete(message).await
    }
}

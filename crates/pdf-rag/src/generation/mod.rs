//! LLM generation: Ollama client, prompts, and the query pipeline

pub mod answer;
mod ollama;
pub mod prompt;

pub use answer::QueryPipeline;
pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;

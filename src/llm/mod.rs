//! LLM integration for SQL Insights.
//!
//! Provides the service trait, the model capability table, prompt
//! construction, and extraction of SQL from free-form completions.

pub mod factory;
pub mod invoker;
pub mod mock;
pub mod models;
pub mod openai;
pub mod parser;
pub mod prompt;
pub mod types;

pub use factory::create_client;
pub use invoker::ModelInvoker;
pub use mock::{MockLlmClient, RecordedCall};
pub use models::{ModelCatalog, ModelProtocol, ModelSpec};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use parser::extract_sql_candidates;
pub use prompt::{build_prompt, PromptContext};
pub use types::{DecodingParams, Message, Role};

use async_trait::async_trait;

use crate::error::Result;

/// Trait for LLM services offering both call shapes.
///
/// Implementations must be thread-safe (Send + Sync) to support async operations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Runs a chat-style exchange and returns the assistant message content.
    async fn chat_complete(
        &self,
        model: &str,
        messages: &[Message],
        params: &DecodingParams,
    ) -> Result<String>;

    /// Runs a completion-style request and returns the choice text.
    async fn complete(&self, model: &str, prompt: &str, params: &DecodingParams) -> Result<String>;
}

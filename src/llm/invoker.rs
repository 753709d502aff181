//! Model invocation.
//!
//! Picks the call shape for a model from the capability table and turns a
//! prompt context into raw completion text.

use tracing::debug;

use crate::error::Result;
use crate::llm::models::{ModelCatalog, ModelProtocol};
use crate::llm::prompt::PromptContext;
use crate::llm::types::DecodingParams;
use crate::llm::LlmClient;

/// Dispatches prompts to the right LLM call shape.
pub struct ModelInvoker<'a> {
    client: &'a dyn LlmClient,
    catalog: &'a ModelCatalog,
}

impl<'a> ModelInvoker<'a> {
    /// Creates a new invoker over the given client and catalog.
    pub fn new(client: &'a dyn LlmClient, catalog: &'a ModelCatalog) -> Self {
        Self { client, catalog }
    }

    /// Sends the prompt to `model` and returns the raw completion text.
    ///
    /// Unknown models fail before the client is touched. Chat models get the
    /// persona as a system message followed by the prompt; completion models
    /// get the prompt alone.
    pub async fn invoke(&self, model: &str, context: &PromptContext) -> Result<String> {
        let spec = self.catalog.lookup(model)?;
        let params = DecodingParams::deterministic();

        debug!("Invoking {} via {} protocol", spec.name, spec.protocol);

        match spec.protocol {
            ModelProtocol::Chat => {
                self.client
                    .chat_complete(&spec.name, &context.messages(), &params)
                    .await
            }
            ModelProtocol::Completion => {
                self.client
                    .complete(&spec.name, context.prompt(), &params)
                    .await
            }
        }
    }
}

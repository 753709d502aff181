//! LLM client factory.
//!
//! Centralizes credential resolution and client construction.

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::llm::{LlmClient, MockLlmClient, OpenAiClient, OpenAiConfig};

/// Creates the LLM client for a run.
///
/// With `use_mock` set, returns the canned-response client and no credential
/// is needed. Otherwise the API key is resolved in order:
/// 1. `llm.api_key` from the config file
/// 2. `OPENAI_API_KEY` environment variable
///
/// A missing key fails here, before any request is attempted.
pub fn create_client(config: &LlmConfig, use_mock: bool) -> Result<Arc<dyn LlmClient>> {
    if use_mock {
        return Ok(Arc::new(MockLlmClient::new()));
    }

    let key = config.resolve_api_key()?;
    let client = OpenAiClient::new(
        OpenAiConfig::new(key)
            .with_base_url(config.base_url.clone())
            .with_timeout(config.timeout_secs),
    )?;
    Ok(Arc::new(client))
}

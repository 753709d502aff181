//! OpenAI LLM client implementation.
//!
//! Implements the LlmClient trait for OpenAI-compatible APIs, covering both
//! the chat-completions and the legacy completions endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{InsightsError, Result};
use crate::llm::types::{DecodingParams, Message};
use crate::llm::LlmClient;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// OpenAI API base URL.
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// OpenAI client configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL; `/chat/completions` and `/completions` are appended.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Creates a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// OpenAI LLM client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiClient {
    /// Creates a new OpenAI client with the given configuration.
    ///
    /// An empty API key is rejected here, before any request is attempted.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(InsightsError::config(
                "OpenAI API key not configured. Set OPENAI_API_KEY or llm.api_key.",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InsightsError::llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Converts internal messages to OpenAI API format.
    fn convert_messages(messages: &[Message]) -> Vec<OpenAiMessage> {
        messages
            .iter()
            .map(|m| OpenAiMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect()
    }

    /// Maps a non-success response to a model invocation error.
    fn parse_error(status: reqwest::StatusCode, body: &str) -> InsightsError {
        let payload = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .or_else(|| (!body.is_empty()).then(|| serde_json::Value::String(body.to_string())));

        let message = if status == reqwest::StatusCode::UNAUTHORIZED {
            "Authentication failed. Check your OPENAI_API_KEY.".to_string()
        } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            "Rate limited. Please wait and try again.".to_string()
        } else if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            format!("OpenAI API error: {}", error_response.error.message)
        } else {
            format!("OpenAI API error ({})", status)
        };

        InsightsError::llm_upstream(message, status.as_u16(), payload)
    }

    /// Maps a transport failure to a model invocation error.
    fn request_error(e: reqwest::Error) -> InsightsError {
        if e.is_timeout() {
            InsightsError::llm("Request timed out. Try again.")
        } else if e.is_connect() {
            InsightsError::llm("Failed to connect to OpenAI API. Check your network.")
        } else {
            InsightsError::llm(format!("Request failed: {}", e))
        }
    }

    /// Posts a request body and decodes the success envelope.
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<(reqwest::StatusCode, String, R)>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(Self::request_error)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| InsightsError::llm(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &text));
        }

        let decoded: R = serde_json::from_str(&text).map_err(|e| {
            InsightsError::llm_upstream(
                format!("Failed to parse response: {}", e),
                status.as_u16(),
                Some(serde_json::Value::String(text.clone())),
            )
        })?;

        Ok((status, text, decoded))
    }
}

/// Builds the error for a success envelope with no choices.
fn empty_choices(status: reqwest::StatusCode, body: String) -> InsightsError {
    let payload = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
    InsightsError::llm_upstream("No response from OpenAI", status.as_u16(), Some(payload))
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat_complete(
        &self,
        model: &str,
        messages: &[Message],
        params: &DecodingParams,
    ) -> Result<String> {
        let request = ChatRequest {
            model,
            messages: Self::convert_messages(messages),
            params,
        };

        let (status, body, response): (_, _, ChatResponse) =
            self.post("chat/completions", &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| empty_choices(status, body))
    }

    async fn complete(&self, model: &str, prompt: &str, params: &DecodingParams) -> Result<String> {
        let request = CompletionRequest {
            model,
            prompt,
            params,
        };

        let (status, body, response): (_, _, CompletionResponse) =
            self.post("completions", &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| empty_choices(status, body))
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage>,
    #[serde(flatten)]
    params: &'a DecodingParams,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(flatten)]
    params: &'a DecodingParams,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiError,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    message: String,
}

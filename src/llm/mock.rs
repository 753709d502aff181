//! Mock LLM client for testing.
//!
//! Provides deterministic responses based on input patterns and records
//! every call so tests can assert on what reached the service.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::{InsightsError, Result};
use crate::llm::types::{DecodingParams, Message, Role};
use crate::llm::LlmClient;

/// One recorded call against the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Chat {
        model: String,
        messages: Vec<Message>,
        params: DecodingParams,
    },
    Completion {
        model: String,
        prompt: String,
        params: DecodingParams,
    },
}

impl RecordedCall {
    /// Decoding parameters the call was made with.
    pub fn params(&self) -> &DecodingParams {
        match self {
            Self::Chat { params, .. } | Self::Completion { params, .. } => params,
        }
    }

    /// Model the call targeted.
    pub fn model(&self) -> &str {
        match self {
            Self::Chat { model, .. } | Self::Completion { model, .. } => model,
        }
    }
}

/// Mock LLM client that returns canned responses based on input patterns.
///
/// Used for unit testing without making real API calls.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response).
    custom_responses: Vec<(String, String)>,
    /// When set, every call fails with this (status, message).
    failure: Option<(u16, String)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the input contains `pattern`, the mock will return `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Makes every call fail as if the service answered with `status`.
    pub fn failing_with(mut self, status: u16, message: impl Into<String>) -> Self {
        self.failure = Some((status, message.into()));
        self
    }

    /// Returns all calls made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Returns the number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn record(&self, call: RecordedCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn respond(&self, input: &str) -> Result<String> {
        if let Some((status, message)) = &self.failure {
            return Err(InsightsError::llm_upstream(
                message.clone(),
                *status,
                Some(serde_json::json!({ "error": { "message": message } })),
            ));
        }
        Ok(self.mock_response(input))
    }

    /// Generates a mock response based on the input.
    fn mock_response(&self, input: &str) -> String {
        // Only the question tail is matched, not the schema preamble.
        let question = input
            .rsplit("provide sql for:")
            .next()
            .unwrap_or(input)
            .to_lowercase();

        // Check custom responses first
        for (pattern, response) in &self.custom_responses {
            if question.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        if question.contains("top airport") && question.contains("2008") {
            return "```sql\nSELECT Airport, Total_Cargo FROM tbl_2008_final_statistics ORDER BY Total_Cargo DESC LIMIT 1;\n```".to_string();
        }

        if question.contains("count") && question.contains("airports") {
            return "```sql\nSELECT COUNT(*) AS airports FROM tbl_2008_final_statistics;\n```"
                .to_string();
        }

        if question.contains("compare") {
            return "```sql\nSELECT Airport, Total_Cargo FROM tbl_2007_final_statistics WHERE Rank = 1;\n```\n\n```sql\nSELECT Airport, Total_Cargo FROM tbl_2008_final_statistics WHERE Rank = 1;\n```".to_string();
        }

        "I don't understand that question. Could you please rephrase it?".to_string()
    }

    /// Extracts the last user message content from a message list.
    fn extract_user_input(messages: &[Message]) -> String {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn chat_complete(
        &self,
        model: &str,
        messages: &[Message],
        params: &DecodingParams,
    ) -> Result<String> {
        self.record(RecordedCall::Chat {
            model: model.to_string(),
            messages: messages.to_vec(),
            params: params.clone(),
        });
        self.respond(&Self::extract_user_input(messages))
    }

    async fn complete(&self, model: &str, prompt: &str, params: &DecodingParams) -> Result<String> {
        self.record(RecordedCall::Completion {
            model: model.to_string(),
            prompt: prompt.to_string(),
            params: params.clone(),
        });
        self.respond(prompt)
    }
}

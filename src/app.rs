//! Core orchestrator for SQL Insights.
//!
//! Coordinates the LLM client, the model capability table, and the dataset
//! connector to turn one question into position-aligned result sets.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::db::{DatabaseConnector, ResultSet};
use crate::error::{InsightsError, Result};
use crate::llm::{extract_sql_candidates, LlmClient, ModelCatalog, ModelInvoker, PromptContext};
use crate::query::QueryExecutor;

/// One "ask a question" request.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    pub model: String,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            model: model.into(),
        }
    }
}

/// Result sets for one request, aligned with the order of the extracted statements.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResponse {
    pub results: Vec<ResultSet>,
}

/// The main orchestrator that coordinates all components.
pub struct Orchestrator {
    /// LLM client for generating SQL from natural language.
    llm: Arc<dyn LlmClient>,
    /// Model name → call shape.
    catalog: ModelCatalog,
    /// Opens one database client per request.
    connector: Arc<dyn DatabaseConnector>,
    /// Upper bound for a whole request.
    timeout: Option<Duration>,
}

impl Orchestrator {
    /// Creates a new orchestrator with the given components.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        catalog: ModelCatalog,
        connector: Arc<dyn DatabaseConnector>,
    ) -> Self {
        Self {
            llm,
            catalog,
            connector,
            timeout: None,
        }
    }

    /// Bounds every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the model capability table.
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Answers a question: prompt, invoke, extract, execute.
    ///
    /// The response is all-or-nothing: a failing statement discards the
    /// results gathered before it.
    pub async fn ask(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let question = request.question.trim();
        let model = request.model.trim();

        if question.is_empty() {
            return Err(InsightsError::validation("Please enter a valid query"));
        }
        if model.is_empty() {
            return Err(InsightsError::validation("Please choose a model"));
        }

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(question, model))
                .await
                .map_err(|_| InsightsError::Timeout(limit))?,
            None => self.run(question, model).await,
        }
    }

    async fn run(&self, question: &str, model: &str) -> Result<QueryResponse> {
        let context = PromptContext::new(question);

        info!("Asking {} for SQL", model);
        let raw = ModelInvoker::new(self.llm.as_ref(), &self.catalog)
            .invoke(model, &context)
            .await?;

        let statements = extract_sql_candidates(&raw);

        let db = self.connector.connect().await?;
        let outcome = QueryExecutor::new(db.as_ref())
            .with_model(model)
            .execute_all(&statements)
            .await;

        // Released on every path, including a mid-sequence failure.
        if let Err(e) = db.close().await {
            warn!("Failed to close database connection: {}", e);
        }

        let results = outcome?;
        info!(
            "Results: {}",
            serde_json::to_string(&results).unwrap_or_else(|e| e.to_string())
        );

        Ok(QueryResponse { results })
    }
}

//! Error types for SQL Insights.
//!
//! Defines the main error enum used throughout the pipeline and the
//! structured description handed back to callers.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Main error type for pipeline operations.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// Empty or missing question or model identifier.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Model identifier not present in the capability table.
    #[error("Unknown model: '{0}' is not in the model catalog")]
    UnknownModel(String),

    /// Upstream LLM failures (auth, rate limits, network, malformed envelopes).
    #[error("Model invocation error: {message}")]
    ModelInvocation {
        message: String,
        /// HTTP status returned by the LLM service, if a response arrived.
        status: Option<u16>,
        /// Response payload returned by the LLM service, if any.
        payload: Option<serde_json::Value>,
    },

    /// A candidate statement failed against the database.
    #[error("Query error in statement {position}: {message}")]
    QueryExecution {
        /// Zero-based position of the statement in the candidate sequence.
        position: usize,
        statement: String,
        message: String,
    },

    /// Driver failure not yet attributed to a candidate position.
    #[error("Database error: {0}")]
    Database(String),

    /// The dataset could not be opened.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration errors (invalid config file, missing credential, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request did not finish within the configured timeout.
    #[error("Request timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of an error for callers deciding how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The request or the deployment is misconfigured; retrying will not help.
    Configuration,
    /// The LLM service misbehaved; a later retry may succeed.
    Upstream,
    /// The generated SQL or the dataset is at fault.
    Data,
    /// A bug.
    Internal,
}

impl InsightsError {
    /// Creates a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates an unknown-model error for the given identifier.
    pub fn unknown_model(model: impl Into<String>) -> Self {
        Self::UnknownModel(model.into())
    }

    /// Creates a model invocation error without upstream status or payload.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::ModelInvocation {
            message: msg.into(),
            status: None,
            payload: None,
        }
    }

    /// Creates a model invocation error carrying the upstream status and payload.
    pub fn llm_upstream(
        msg: impl Into<String>,
        status: u16,
        payload: Option<serde_json::Value>,
    ) -> Self {
        Self::ModelInvocation {
            message: msg.into(),
            status: Some(status),
            payload,
        }
    }

    /// Creates a query execution error for the statement at `position`.
    pub fn query(position: usize, statement: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::QueryExecution {
            position,
            statement: statement.into(),
            message: msg.into(),
        }
    }

    /// Creates a driver error with the given message.
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation Error",
            Self::UnknownModel(_) => "Unknown Model Error",
            Self::ModelInvocation { .. } => "Model Invocation Error",
            Self::QueryExecution { .. } => "Query Execution Error",
            Self::Database(_) => "Database Error",
            Self::Connection(_) => "Connection Error",
            Self::Config(_) => "Configuration Error",
            Self::Timeout(_) => "Timeout Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the coarse error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::UnknownModel(_) | Self::Config(_) => {
                ErrorKind::Configuration
            }
            Self::ModelInvocation { .. } | Self::Timeout(_) => ErrorKind::Upstream,
            Self::QueryExecution { .. } | Self::Database(_) | Self::Connection(_) => {
                ErrorKind::Data
            }
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Renders the error as a serializable description for callers.
    pub fn to_body(&self) -> ErrorBody {
        let mut body = ErrorBody {
            category: self.category(),
            kind: self.kind(),
            message: self.to_string(),
            status: None,
            payload: None,
            statement: None,
            position: None,
        };

        match self {
            Self::ModelInvocation {
                status, payload, ..
            } => {
                body.status = *status;
                body.payload = payload.clone();
            }
            Self::QueryExecution {
                position,
                statement,
                ..
            } => {
                body.position = Some(*position);
                body.statement = Some(statement.clone());
            }
            _ => {}
        }

        body
    }
}

/// Structured error description returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub category: &'static str,
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

/// Result type alias using InsightsError.
pub type Result<T> = std::result::Result<T, InsightsError>;

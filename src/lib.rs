//! SQL Insights - ask a tabular dataset questions in plain English.
//!
//! This library exposes the core modules for use in integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod query;

pub use app::{Orchestrator, QueryRequest, QueryResponse};
pub use error::{InsightsError, Result};

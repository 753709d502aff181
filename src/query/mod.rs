//! Query execution for SQL Insights.
//!
//! This module isolates SQL execution from the orchestrator.

pub mod executor;

pub use executor::QueryExecutor;

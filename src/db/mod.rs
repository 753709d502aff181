//! Database abstraction layer for SQL Insights.
//!
//! Provides a trait-based interface for executing statements against the
//! dataset, plus the connector the orchestrator uses to open one client per
//! request.

mod mock;
mod sqlite;
mod statement;
mod types;

pub use mock::{MockConnector, MockDatabaseClient};
pub use sqlite::{seed_database, SqliteClient, SqliteConnector};
pub use types::{ColumnInfo, ResultSet, Row, Value};

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with InsightsError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL statement and returns its rows.
    ///
    /// Errors carry the driver message only; the caller adds the statement
    /// position.
    async fn execute_query(&self, sql: &str) -> Result<ResultSet>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}

/// Opens database clients.
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// Opens a fresh client; the caller is responsible for closing it.
    async fn connect(&self) -> Result<Box<dyn DatabaseClient>>;
}

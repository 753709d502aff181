//! Sequential execution of candidate statements.
//!
//! Runs extracted SQL one statement at a time against a single client and
//! attributes failures to the statement that caused them.

use tracing::info;

use crate::db::{DatabaseClient, ResultSet};
use crate::error::{InsightsError, Result};

/// Query executor bound to one open database client.
pub struct QueryExecutor<'a> {
    db: &'a dyn DatabaseClient,
    model: Option<&'a str>,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self { db, model: None }
    }

    /// Tags audit log lines with the model that produced the statements.
    pub fn with_model(mut self, model: &'a str) -> Self {
        self.model = Some(model);
        self
    }

    /// Executes the statement at `position` in the candidate sequence.
    pub async fn execute(&self, position: usize, sql: &str) -> Result<ResultSet> {
        info!(
            model = self.model.unwrap_or("-"),
            position,
            "Executing statement:\n{}",
            sql
        );

        let result = self.db.execute_query(sql).await.map_err(|e| match e {
            InsightsError::Database(message) => InsightsError::query(position, sql, message),
            InsightsError::QueryExecution { message, .. } => {
                InsightsError::query(position, sql, message)
            }
            other => InsightsError::query(position, sql, other.to_string()),
        })?;

        info!(
            position,
            rows = result.row_count(),
            columns = %describe_columns(&result),
            elapsed_ms = result.execution_time.as_millis() as u64,
            "Statement finished"
        );

        Ok(result)
    }

    /// Executes all candidates in order, stopping at the first failure.
    ///
    /// Results are position-aligned with `statements`. Nothing is returned
    /// for a partially executed sequence.
    pub async fn execute_all(&self, statements: &[String]) -> Result<Vec<ResultSet>> {
        let mut results = Vec::with_capacity(statements.len());
        for (position, sql) in statements.iter().enumerate() {
            results.push(self.execute(position, sql).await?);
        }
        Ok(results)
    }
}

/// Renders `name TYPE` pairs for the audit log.
fn describe_columns(result: &ResultSet) -> String {
    result
        .columns
        .iter()
        .map(|col| format!("{} {}", col.name, col.data_type))
        .collect::<Vec<_>>()
        .join(", ")
}

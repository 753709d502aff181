//! Mock database client for testing.
//!
//! Provides an in-memory stand-in that records executed statements and
//! connection lifetimes so tests can assert on them.

use super::{ColumnInfo, DatabaseClient, DatabaseConnector, ResultSet, Row, Value};
use crate::error::{InsightsError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct MockState {
    opened: AtomicUsize,
    closed: AtomicUsize,
    executed: Mutex<Vec<String>>,
    /// Statements containing this text fail.
    fail_on: Option<String>,
    refuse_connections: bool,
}

/// A mock database client that returns predefined results.
#[derive(Debug, Clone, Default)]
pub struct MockDatabaseClient {
    state: Arc<MockState>,
}

impl MockDatabaseClient {
    /// Creates a new mock database client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes statements containing `pattern` fail.
    pub fn failing_on(pattern: impl Into<String>) -> Self {
        Self {
            state: Arc::new(MockState {
                fail_on: Some(pattern.into()),
                ..Default::default()
            }),
        }
    }

    /// Returns the statements executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.state
            .executed
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<ResultSet> {
        if let Ok(mut executed) = self.state.executed.lock() {
            executed.push(sql.to_string());
        }

        if let Some(pattern) = &self.state.fail_on {
            if sql.contains(pattern.as_str()) {
                return Err(InsightsError::database(format!(
                    "near \"{}\": syntax error",
                    pattern
                )));
            }
        }

        let sql_upper = sql.to_uppercase();

        if sql_upper.starts_with("SELECT") {
            // Return a simple result with one row
            let columns = vec![ColumnInfo::new("result", "TEXT")];
            let rows = vec![Row::new().with(
                "result",
                Value::String(format!("Mock result for: {}", sql)),
            )];

            Ok(ResultSet::with_data(columns, rows).with_execution_time(Duration::from_millis(1)))
        } else {
            // For non-SELECT statements, return empty result
            Ok(ResultSet::new().with_execution_time(Duration::from_millis(1)))
        }
    }

    async fn close(&self) -> Result<()> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Connector handing out mock clients that share one recorded state.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    client: MockDatabaseClient,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clients fail statements containing `pattern`.
    pub fn failing_on(pattern: impl Into<String>) -> Self {
        Self {
            client: MockDatabaseClient::failing_on(pattern),
        }
    }

    /// Every connect attempt fails.
    pub fn refusing_connections() -> Self {
        Self {
            client: MockDatabaseClient {
                state: Arc::new(MockState {
                    refuse_connections: true,
                    ..Default::default()
                }),
            },
        }
    }

    /// Number of clients opened.
    pub fn opened(&self) -> usize {
        self.client.state.opened.load(Ordering::SeqCst)
    }

    /// Number of clients closed.
    pub fn closed(&self) -> usize {
        self.client.state.closed.load(Ordering::SeqCst)
    }

    /// Statements executed across all clients, in order.
    pub fn executed(&self) -> Vec<String> {
        self.client.executed()
    }
}

#[async_trait]
impl DatabaseConnector for MockConnector {
    async fn connect(&self) -> Result<Box<dyn DatabaseClient>> {
        if self.client.state.refuse_connections {
            return Err(InsightsError::connection("Mock database refused connection"));
        }
        self.client.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.client.clone()))
    }
}

//! SQLite database client implementation.
//!
//! Provides the `SqliteClient` struct that implements the `DatabaseClient`
//! trait for the local dataset using sqlx. Each client owns a single
//! connection.

use crate::config::DatabaseConfig;
use crate::db::statement::first_statement;
use crate::db::{ColumnInfo, DatabaseClient, DatabaseConnector, ResultSet, Row, Value};
use crate::error::{InsightsError, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo, ValueRef};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT_SECS: u64 = 5;

/// How long opening the connection may take.
const ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// SQLite database client.
#[derive(Debug)]
pub struct SqliteClient {
    pool: SqlitePool,
}

impl SqliteClient {
    /// Opens the dataset described by `config`.
    ///
    /// The file must already exist; a missing dataset is a connection error.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = open_pool(&config.path, config.read_only, false).await?;
        debug!("Opened dataset {}", config.display_string());
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    /// Runs the first statement of `sql`; anything after it is ignored.
    async fn execute_query(&self, sql: &str) -> Result<ResultSet> {
        let statement = first_statement(sql);
        if statement.len() < sql.trim().len() {
            debug!("Ignoring trailing statements after: {}", statement);
        }

        let start = Instant::now();

        let result = sqlx::query(&statement)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| InsightsError::database(format_query_error(e)))?;

        let execution_time = start.elapsed();

        let columns: Vec<ColumnInfo> = result
            .first()
            .map(|first_row| {
                first_row
                    .columns()
                    .iter()
                    .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                    .collect()
            })
            .unwrap_or_default();

        let rows: Vec<Row> = result.iter().map(convert_row).collect();

        Ok(ResultSet::with_data(columns, rows).with_execution_time(execution_time))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Opens a fresh SQLite client per request.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    config: DatabaseConfig,
}

impl SqliteConnector {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DatabaseConnector for SqliteConnector {
    async fn connect(&self) -> Result<Box<dyn DatabaseClient>> {
        Ok(Box::new(SqliteClient::connect(&self.config).await?))
    }
}

/// Applies a multi-statement SQL script to the database at `path`,
/// creating the file if needed.
pub async fn seed_database(path: &Path, script: &str) -> Result<()> {
    let pool = open_pool(path, false, true).await?;

    let outcome = sqlx::raw_sql(script)
        .execute(&pool)
        .await
        .map_err(|e| InsightsError::database(format_query_error(e)));

    pool.close().await;
    outcome.map(|_| ())
}

/// Creates a single-connection pool to the SQLite file.
async fn open_pool(path: &Path, read_only: bool, create: bool) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(read_only)
        .create_if_missing(create)
        .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));

    SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .connect_with(options)
        .await
        .map_err(|e| {
            InsightsError::connection(format!(
                "Cannot open database {}: {e}",
                path.display()
            ))
        })
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    let mut converted = Row::new();
    for (i, col) in row.columns().iter().enumerate() {
        converted.push(col.name(), convert_value(row, i));
    }
    converted
}

/// Converts a single column value using the storage class of the value itself.
///
/// SQLite is dynamically typed, so the declared column type is only a hint.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match type_name.as_str() {
        "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "INTEGER" | "INT" | "BIGINT" | "INT8" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // For all other types, try to get as string
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

/// Formats a driver error, preferring the database's own message.
fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => match db_error.code() {
            Some(code) => format!("{} (code {})", db_error.message(), code),
            None => db_error.message().to_string(),
        },
        None => error.to_string(),
    }
}

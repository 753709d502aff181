//! SQLite dataset integration tests.

use pretty_assertions::assert_eq;
use sql_insights::config::DatabaseConfig;
use sql_insights::db::{seed_database, DatabaseConnector, SqliteConnector, Value};
use sql_insights::InsightsError;

use super::{seeded_dataset, AIRPORTS_SQL};

const TABLES: [&str; 7] = [
    "tbl_2004_final_statistics",
    "tbl_2007_final_statistics",
    "tbl_2008_final_statistics",
    "tbl_2009_final_statistics",
    "tbl_2010_final_statistics",
    "tbl_2011_preliminary_statistics",
    "tbl_2012_preliminary_statistics",
];

#[tokio::test]
async fn test_sample_dataset_has_all_tables() {
    let (path, _dir) = seeded_dataset().await;
    let client = SqliteConnector::new(DatabaseConfig::new(&path))
        .connect()
        .await
        .unwrap();

    let result = client
        .execute_query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .await
        .unwrap();

    let names: Vec<Value> = result
        .rows
        .iter()
        .filter_map(|row| row.get("name").cloned())
        .collect();
    let expected: Vec<Value> = TABLES.iter().map(|t| Value::from(*t)).collect();
    assert_eq!(names, expected);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_2004_table_has_extra_columns() {
    let (path, _dir) = seeded_dataset().await;
    let client = SqliteConnector::new(DatabaseConfig::new(&path))
        .connect()
        .await
        .unwrap();

    let result = client
        .execute_query(
            "SELECT Code, Location, Prev_Rank FROM tbl_2004_final_statistics WHERE Rank = 4",
        )
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!([{ "Code": "ANC", "Location": "United States", "Prev_Rank": 5 }])
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_reseeding_replaces_tables() {
    let (path, _dir) = seeded_dataset().await;
    seed_database(&path, AIRPORTS_SQL).await.unwrap();

    let client = SqliteConnector::new(DatabaseConfig::new(&path))
        .connect()
        .await
        .unwrap();
    let result = client
        .execute_query("SELECT COUNT(*) AS n FROM tbl_2010_final_statistics")
        .await
        .unwrap();
    assert_eq!(result.rows[0].get("n"), Some(&Value::Int(5)));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_bad_seed_script_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = seed_database(&dir.path().join("x.db"), "CREATE TABLE (")
        .await
        .unwrap_err();
    assert!(matches!(err, InsightsError::Database(_)));
}

//! End-to-end pipeline tests: mock LLM, real SQLite dataset.

use pretty_assertions::assert_eq;
use sql_insights::config::DatabaseConfig;
use sql_insights::db::{SqliteConnector, Value};
use sql_insights::error::ErrorKind;
use sql_insights::llm::{MockLlmClient, ModelCatalog, ModelProtocol, RecordedCall};
use sql_insights::{InsightsError, Orchestrator, QueryRequest};
use std::path::Path;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

use super::seeded_dataset;

fn orchestrator(llm: &Arc<MockLlmClient>, path: &Path) -> Orchestrator {
    Orchestrator::new(
        llm.clone(),
        ModelCatalog::builtin(),
        Arc::new(SqliteConnector::new(DatabaseConfig::new(path))),
    )
}

#[tokio::test]
async fn test_top_airport_2008_with_chat_model() {
    let (path, _dir) = seeded_dataset().await;
    let llm = Arc::new(MockLlmClient::new());

    let response = assert_ok!(
        orchestrator(&llm, &path)
            .ask(&QueryRequest::new(
                "What was the top airport by cargo in 2008?",
                "gpt-4"
            ))
            .await
    );

    assert_eq!(response.results.len(), 1);
    let rows = &response.results[0].rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].get("Airport"),
        Some(&Value::from("Memphis International Airport"))
    );
    assert_eq!(rows[0].get("Total_Cargo"), Some(&Value::Float(3695438.0)));

    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], RecordedCall::Chat { .. }));
}

#[tokio::test]
async fn test_completion_model_uses_flat_prompt() {
    let (path, _dir) = seeded_dataset().await;
    let llm = Arc::new(MockLlmClient::new());

    let response = assert_ok!(
        orchestrator(&llm, &path)
            .ask(&QueryRequest::new("count the airports", "text-davinci-003"))
            .await
    );

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({ "results": [[{ "airports": 5 }]] })
    );
    match &llm.calls()[0] {
        RecordedCall::Completion { prompt, params, .. } => {
            assert!(prompt.ends_with("do not explain only provide sql for:\ncount the airports"));
            assert_eq!(params.stop, vec!["You:".to_string()]);
        }
        other => panic!("Expected completion call, got {:?}", other),
    }
}

#[tokio::test]
async fn test_multiple_blocks_are_position_aligned() {
    let (path, _dir) = seeded_dataset().await;
    let llm = Arc::new(MockLlmClient::new());

    let response = assert_ok!(
        orchestrator(&llm, &path)
            .ask(&QueryRequest::new("compare the 2007 and 2008 leaders", "gpt-3.5-turbo"))
            .await
    );

    assert_eq!(response.results.len(), 2);
    assert_eq!(
        response.results[0].rows[0].get("Total_Cargo"),
        Some(&Value::Float(3840491.0))
    );
    assert_eq!(
        response.results[1].rows[0].get("Total_Cargo"),
        Some(&Value::Float(3695438.0))
    );
}

#[tokio::test]
async fn test_failure_stops_later_statements() {
    let (path, _dir) = seeded_dataset().await;
    let llm = Arc::new(MockLlmClient::new().with_response(
        "clean up",
        "```sql\nSELECT 1;\n```\n```sql\nSELECT * FROM missing_table;\n```\n```sql\nDELETE FROM tbl_2008_final_statistics;\n```",
    ));

    let err = assert_err!(
        orchestrator(&llm, &path)
            .ask(&QueryRequest::new("clean up the data", "gpt-4"))
            .await
    );

    match &err {
        InsightsError::QueryExecution {
            position,
            statement,
            message,
        } => {
            assert_eq!(*position, 1);
            assert_eq!(statement, "SELECT * FROM missing_table;");
            assert!(message.contains("missing_table"));
        }
        other => panic!("Expected QueryExecution, got {:?}", other),
    }
    assert_eq!(err.kind(), ErrorKind::Data);

    // The DELETE after the failing statement never ran.
    let check = Arc::new(MockLlmClient::new());
    let response = assert_ok!(
        orchestrator(&check, &path)
            .ask(&QueryRequest::new("count airports", "gpt-4"))
            .await
    );
    assert_eq!(
        response.results[0].rows[0].get("airports"),
        Some(&Value::Int(5))
    );
}

#[tokio::test]
async fn test_prose_answer_fails_at_database() {
    let (path, _dir) = seeded_dataset().await;
    let llm = Arc::new(MockLlmClient::new());

    let err = assert_err!(
        orchestrator(&llm, &path)
            .ask(&QueryRequest::new("what is the meaning of life", "gpt-4"))
            .await
    );

    match err {
        InsightsError::QueryExecution {
            position,
            statement,
            ..
        } => {
            assert_eq!(position, 0);
            assert!(statement.starts_with("I don't understand"));
        }
        other => panic!("Expected QueryExecution, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_model_makes_no_calls() {
    let (path, _dir) = seeded_dataset().await;
    let llm = Arc::new(MockLlmClient::new());

    let err = assert_err!(
        orchestrator(&llm, &path)
            .ask(&QueryRequest::new("count airports", "unknown-model"))
            .await
    );

    assert!(matches!(err, InsightsError::UnknownModel(ref m) if m == "unknown-model"));
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_empty_question_is_validation_error() {
    let (path, _dir) = seeded_dataset().await;
    let llm = Arc::new(MockLlmClient::new());

    let err = assert_err!(
        orchestrator(&llm, &path)
            .ask(&QueryRequest::new("   ", "gpt-4"))
            .await
    );

    assert_eq!(err.to_string(), "Validation error: Please enter a valid query");
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_extended_catalog_entry() {
    let (path, _dir) = seeded_dataset().await;
    let llm = Arc::new(MockLlmClient::new());
    let orchestrator = Orchestrator::new(
        llm.clone(),
        ModelCatalog::builtin().with_model("local-sql", ModelProtocol::Completion),
        Arc::new(SqliteConnector::new(DatabaseConfig::new(&path))),
    );

    assert_ok!(
        orchestrator
            .ask(&QueryRequest::new("count airports", "local-sql"))
            .await
    );
    assert!(matches!(llm.calls()[0], RecordedCall::Completion { .. }));
}

#[tokio::test]
async fn test_missing_dataset_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let llm = Arc::new(MockLlmClient::new());

    let err = assert_err!(
        orchestrator(&llm, &dir.path().join("nope.db"))
            .ask(&QueryRequest::new("count airports", "gpt-4"))
            .await
    );

    assert!(matches!(err, InsightsError::Connection(_)));
    // The model was asked before the connection was opened.
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn test_block_with_two_statements_yields_one_result_shape() {
    let (path, _dir) = seeded_dataset().await;
    let llm = Arc::new(MockLlmClient::new().with_response(
        "both leaders",
        "```sql\nSELECT Airport FROM tbl_2007_final_statistics WHERE Rank = 1;\nSELECT Code, Total_Cargo FROM tbl_2008_final_statistics WHERE Rank = 1;\n```",
    ));

    let response = assert_ok!(
        orchestrator(&llm, &path)
            .ask(&QueryRequest::new("show both leaders", "gpt-4"))
            .await
    );

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({ "results": [[{ "Airport": "Memphis International Airport" }]] })
    );
}

#[tokio::test]
async fn test_join_with_repeated_column_keeps_last_value() {
    let (path, _dir) = seeded_dataset().await;
    let llm = Arc::new(MockLlmClient::new().with_response(
        "year over year",
        "```sql\nSELECT a.Airport, b.Airport FROM tbl_2007_final_statistics a \
         JOIN tbl_2008_final_statistics b ON b.Rank = a.Rank WHERE a.Rank = 4\n```",
    ));

    let response = assert_ok!(
        orchestrator(&llm, &path)
            .ask(&QueryRequest::new("year over year fourth place", "gpt-4"))
            .await
    );

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({
            "results": [[{ "Airport": "Incheon International Airport" }]]
        })
    );
}

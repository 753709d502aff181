//! SQL Insights - ask a tabular dataset questions in plain English.

use anyhow::Context;
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use sql_insights::cli::{Cli, Command};
use sql_insights::config::Config;
use sql_insights::db::{seed_database, SqliteConnector};
use sql_insights::error::ErrorBody;
use sql_insights::llm::create_client;
use sql_insights::logging;
use sql_insights::{InsightsError, Orchestrator, QueryRequest};

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();
    logging::init_stderr_logging();

    let cli = Cli::parse_args();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let body = match e.downcast_ref::<InsightsError>() {
                Some(insights) => {
                    error!("{}: {}", insights.category(), insights);
                    insights.to_body()
                }
                None => {
                    error!("{:#}", e);
                    InsightsError::internal(format!("{:#}", e)).to_body()
                }
            };
            match serde_json::to_string_pretty(&ErrorEnvelope { error: body }) {
                Ok(json) => println!("{json}"),
                Err(_) => println!(r#"{{"error":{{"message":"{}"}}}}"#, e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;

    if let Some(path) = &cli.database {
        config.database.path = path.clone();
    }

    match &cli.command {
        Command::Ask { question, model } => {
            let llm = create_client(&config.llm, cli.mock_llm)?;
            info!("Dataset: {}", config.database.display_string());

            let orchestrator = Orchestrator::new(
                llm,
                config.model_catalog(),
                Arc::new(SqliteConnector::new(config.database.clone())),
            )
            .with_timeout(config.pipeline.request_timeout());

            let response = orchestrator
                .ask(&QueryRequest::new(question.as_str(), model.as_str()))
                .await?;

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Models => {
            let specs = config.model_catalog().specs();
            println!("{}", serde_json::to_string_pretty(&specs)?);
        }
        Command::Seed { script } => {
            let sql = std::fs::read_to_string(script)
                .with_context(|| format!("Failed to read seed script {}", script.display()))?;
            seed_database(&config.database.path, &sql).await?;
            info!(
                "Seeded {} from {}",
                config.database.path.display(),
                script.display()
            );
        }
    }

    Ok(())
}

//! Command-line argument parsing for SQL Insights.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default model for `ask`.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Ask questions about the airport cargo dataset in plain English.
#[derive(Parser, Debug)]
#[command(name = "sql-insights")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite dataset path (overrides the config file)
    #[arg(long, global = true, value_name = "PATH", env = "SQL_INSIGHTS_DATABASE")]
    pub database: Option<PathBuf>,

    /// Use the offline mock LLM instead of the HTTP service
    #[arg(long, global = true)]
    pub mock_llm: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Translate a question to SQL, run it, and print the rows as JSON
    Ask {
        /// The question, in plain English
        #[arg(value_name = "QUESTION")]
        question: String,

        /// Model identifier from the capability table
        #[arg(short, long, value_name = "MODEL", default_value = DEFAULT_MODEL)]
        model: String,
    },

    /// List the known models and their call shape
    Models,

    /// Apply a SQL script to the dataset, creating the file if needed
    Seed {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }
}

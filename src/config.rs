//! Configuration management for SQL Insights.
//!
//! Handles loading configuration from TOML files and environment variables:
//! LLM service settings, the dataset location, the request timeout, and
//! extra entries for the model capability table.

use crate::error::{InsightsError, Result};
use crate::llm::openai::OPENAI_API_URL;
use crate::llm::{ModelCatalog, ModelProtocol};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the LLM API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM service configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Dataset configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Orchestrator settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Extra capability-table entries, merged over the built-in ones.
    #[serde(default)]
    pub models: HashMap<String, ModelProtocol>,
}

/// LLM service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key (not recommended to store in config; `OPENAI_API_KEY` is preferred).
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    OPENAI_API_URL.to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl LlmConfig {
    /// Resolves the API key: config value first, then `OPENAI_API_KEY`.
    ///
    /// Blank values count as absent.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var(API_KEY_ENV)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
            .ok_or_else(|| {
                InsightsError::config(format!(
                    "OpenAI API key not configured. Set {API_KEY_ENV} or llm.api_key."
                ))
            })
    }
}

/// Dataset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Open the dataset read-only.
    #[serde(default)]
    pub read_only: bool,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("airports.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            read_only: false,
        }
    }
}

impl DatabaseConfig {
    /// Creates a config for the given database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_only: false,
        }
    }

    /// Returns a display string for logs.
    pub fn display_string(&self) -> String {
        let mode = if self.read_only { "ro" } else { "rw" };
        format!("{} ({mode})", self.path.display())
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    /// Upper bound for a whole request, in seconds. Unset means no limit.
    pub request_timeout_secs: Option<u64>,
}

impl PipelineConfig {
    /// Returns the request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sql-insights")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| InsightsError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            InsightsError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Builds the capability table: built-in entries plus `[models]`.
    pub fn model_catalog(&self) -> ModelCatalog {
        let mut catalog = ModelCatalog::builtin();
        catalog.extend(self.models.clone());
        catalog
    }
}

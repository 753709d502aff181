//! Common test utilities for binary tests.

use std::path::Path;
use std::process::Command;

/// Runs the binary with an isolated config and dataset.
///
/// Returns (exit code, stdout, stderr).
pub fn run_cli(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_sql-insights"))
        .arg("--config")
        .arg(dir.join("config.toml"))
        .arg("--database")
        .arg(dir.join("airports.db"))
        .args(args)
        .env_remove("OPENAI_API_KEY")
        .env_remove("SQL_INSIGHTS_DATABASE")
        .env("RUST_LOG", "warn")
        .current_dir(dir)
        .output()
        .expect("Failed to execute sql-insights");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

/// Path of the sample dataset script.
pub fn airports_script() -> String {
    format!("{}/data/airports.sql", env!("CARGO_MANIFEST_DIR"))
}

//! Library-level integration tests.

pub mod config_test;
pub mod pipeline_test;
pub mod sqlite_test;

use sql_insights::db::seed_database;
use std::path::PathBuf;
use tempfile::TempDir;

/// Sample dataset shipped with the crate.
pub const AIRPORTS_SQL: &str = include_str!("../../data/airports.sql");

/// Seeds a fresh dataset in a temp dir and returns its path.
pub async fn seeded_dataset() -> (PathBuf, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("airports.db");
    seed_database(&path, AIRPORTS_SQL).await.unwrap();
    (path, dir)
}

//! Tests that drive the `sql-insights` binary.

pub mod common;

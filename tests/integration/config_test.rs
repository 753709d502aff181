//! Configuration loading integration tests.

use pretty_assertions::assert_eq;
use sql_insights::config::Config;
use sql_insights::llm::ModelProtocol;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_load_full_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[llm]
base_url = "http://localhost:1234/v1"

[database]
path = "data/airports.db"
read_only = true

[pipeline]
request_timeout_secs = 30

[models]
"gpt-4o" = "chat"
"#
    )
    .unwrap();

    let config = Config::load_from_file(file.path()).unwrap();

    assert_eq!(config.llm.base_url, "http://localhost:1234/v1");
    assert_eq!(config.llm.timeout_secs, 60);
    assert_eq!(config.database.path, PathBuf::from("data/airports.db"));
    assert!(config.database.read_only);
    assert_eq!(
        config.pipeline.request_timeout(),
        Some(Duration::from_secs(30))
    );

    let catalog = config.model_catalog();
    assert_eq!(
        catalog.lookup("gpt-4o").unwrap().protocol,
        ModelProtocol::Chat
    );
    assert_eq!(
        catalog.lookup("text-davinci-003").unwrap().protocol,
        ModelProtocol::Completion
    );
}

#[test]
fn test_missing_config_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from_file(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.database.path, PathBuf::from("airports.db"));
    assert_eq!(config.pipeline.request_timeout(), None);
    assert_eq!(config.model_catalog().len(), 3);
}

#[test]
fn test_invalid_protocol_is_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[models]\n\"odd\" = \"telepathy\"").unwrap();

    let err = Config::load_from_file(file.path()).unwrap_err();
    assert_eq!(err.category(), "Configuration Error");
}

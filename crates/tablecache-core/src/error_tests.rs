//! Tests for `error` module

use super::config::ConfigError;
use super::error::*;
use super::name::TableName;

fn transport(msg: &str) -> super::opener::BoxError {
    Box::new(std::io::Error::other(msg.to_string()))
}

#[test]
fn test_error_codes_are_unique() {
    // Arrange
    let errors = [
        Error::Open {
            name: TableName::from("t"),
            source: transport("refused"),
        },
        Error::Close {
            name: TableName::from("t"),
            source: transport("reset"),
        },
        Error::Config("bad".into()),
    ];

    // Act
    let mut codes: Vec<&str> = errors.iter().map(Error::code).collect();
    let total = codes.len();
    codes.sort_unstable();
    codes.dedup();

    // Assert
    assert_eq!(codes.len(), total, "Error codes must be unique");
    for code in &codes {
        assert!(code.starts_with("TCACHE-"), "Code {code} should start with TCACHE-");
    }
}

#[test]
fn test_open_error_display_includes_name_and_cause() {
    // Arrange
    let err = Error::Open {
        name: TableName::from("index_table"),
        source: transport("connection refused"),
    };

    // Act
    let display = err.to_string();

    // Assert
    assert!(display.contains("[TCACHE-001]"));
    assert!(display.contains("index_table"));
    assert!(display.contains("connection refused"));
}

#[test]
fn test_open_error_exposes_source() {
    use std::error::Error as _;

    let err = Error::Open {
        name: TableName::from("t"),
        source: transport("timeout"),
    };

    let source = err.source().expect("open error carries its cause");
    assert_eq!(source.to_string(), "timeout");
}

#[test]
fn test_recoverability() {
    let open = Error::Open {
        name: TableName::from("t"),
        source: transport("x"),
    };
    assert!(open.is_recoverable());
    assert!(!Error::Config("capacity".into()).is_recoverable());
}

#[test]
fn test_config_error_conversion() {
    // Arrange
    let cfg = ConfigError::InvalidValue {
        key: "cache.size".to_string(),
        message: "must be > 0".to_string(),
    };

    // Act
    let err: Error = cfg.into();

    // Assert
    assert_eq!(err.code(), "TCACHE-003");
    assert!(err.to_string().contains("cache.size"));
}

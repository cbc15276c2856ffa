//! Integration tests for logger behavior.

use degree_admin::logger::{init_file_logging, set_level, set_level_from_str, Level};
use degree_admin::{debug, error, info, warn};

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("warn"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
}

#[test]
fn level_names_parse() {
    assert_eq!(Level::parse("WARNING"), Some(Level::Warn));
    assert_eq!(Level::parse("err"), Some(Level::Error));
    assert_eq!(Level::parse("trace"), None);
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration");
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_writes_tagged_lines() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("logs").join("degreeadmin.log");

    assert!(init_file_logging(&path));
    error!("file logging integration");

    let content = std::fs::read_to_string(&path).expect("log file should exist");
    assert!(content.contains("[ERROR]"));
    assert!(content.contains("file logging integration"));
}

// tests/config_loading.rs

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use cncwatch::config::{load_and_validate, load_or_default};
use cncwatch::errors::CncwatchError;
use cncwatch::pairing::{FileKind, PairingRule};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_is_loaded() {
    let file = write_config(
        r#"
[watch]
dir = "/mnt/cnc"
data_extension = "bin"
index_extension = "idx"
autostart = true
shutdown_timeout_ms = 1500

[log]
level = "debug"
file = "/tmp/cncwatch-test.log"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.watch.dir.as_deref(), Some(std::path::Path::new("/mnt/cnc")));
    assert!(cfg.watch.autostart);
    assert_eq!(cfg.pairing_rule().extension(FileKind::Data), "bin");
    assert_eq!(cfg.pairing_rule().extension(FileKind::Index), "idx");
    assert_eq!(cfg.session_options().shutdown_timeout, Some(Duration::from_millis(1500)));
    assert_eq!(cfg.log_level(), Some(tracing::Level::DEBUG));
}

#[test]
fn identical_extensions_return_config_error() {
    let file = write_config(
        r#"
[watch]
data_extension = "tdms"
index_extension = "tdms"
"#,
    );

    match load_and_validate(file.path()) {
        Err(CncwatchError::ConfigError(msg)) => assert!(msg.contains("must differ")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn unknown_keys_are_toml_errors() {
    let file = write_config("[watch]\nrecursive = true\n");
    assert!(matches!(load_and_validate(file.path()), Err(CncwatchError::TomlError(_))));
}

#[test]
fn optional_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_or_default(dir.path().join("Cncwatch.toml"), false).unwrap();
    assert_eq!(cfg.pairing_rule(), &PairingRule::default());
}

#[test]
fn required_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let res = load_or_default(dir.path().join("Cncwatch.toml"), true);
    assert!(matches!(res, Err(CncwatchError::IoError(_))));
}

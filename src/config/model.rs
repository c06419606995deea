// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::pairing::{DEFAULT_DATA_EXTENSION, DEFAULT_INDEX_EXTENSION, PairingRule};
use crate::session::SessionOptions;

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [watch]
/// dir = "/data"
/// data_extension = "tdms"
/// index_extension = "tdms_index"
/// autostart = false
/// shutdown_timeout_ms = 5000
///
/// [log]
/// level = "info"
/// file = "logs/cncwatch.log"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub log: LogSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Directory to select at startup, as if typed with `setdir`.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Extension of the data half of a recording, without the dot.
    #[serde(default = "default_data_extension")]
    pub data_extension: String,

    /// Extension of the index half of a recording, without the dot.
    #[serde(default = "default_index_extension")]
    pub index_extension: String,

    /// Start observing `dir` right away.
    #[serde(default)]
    pub autostart: bool,

    /// Bound on how long `stop` waits for the observer thread.
    /// Omitted means wait indefinitely.
    #[serde(default)]
    pub shutdown_timeout_ms: Option<u64>,
}

fn default_data_extension() -> String {
    DEFAULT_DATA_EXTENSION.to_string()
}

fn default_index_extension() -> String {
    DEFAULT_INDEX_EXTENSION.to_string()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            dir: None,
            data_extension: default_data_extension(),
            index_extension: default_index_extension(),
            autostart: false,
            shutdown_timeout_ms: None,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// One of error, warn(ing), info, debug, trace.
    #[serde(default)]
    pub level: Option<String>,

    /// Plain-text log file. An empty string disables file logging.
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,
}

pub fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("logs/cncwatch.log"))
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: None,
            file: default_log_file(),
        }
    }
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`),
/// so the derived pairing rule and level are always well-formed.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchSection,
    pub log: LogSection,
    rule: PairingRule,
    level: Option<tracing::Level>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        watch: WatchSection,
        log: LogSection,
        rule: PairingRule,
        level: Option<tracing::Level>,
    ) -> Self {
        Self {
            watch,
            log,
            rule,
            level,
        }
    }

    pub fn pairing_rule(&self) -> &PairingRule {
        &self.rule
    }

    pub fn log_level(&self) -> Option<tracing::Level> {
        self.level
    }

    pub fn log_file(&self) -> Option<&std::path::Path> {
        self.log.file.as_deref()
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            shutdown_timeout: self.watch.shutdown_timeout_ms.map(Duration::from_millis),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(
            WatchSection::default(),
            LogSection::default(),
            PairingRule::default(),
            None,
        )
    }
}

// src/logging.rs

//! Logging setup for `cncwatch` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `[log].level` in the config file
//! 3. `CNCWATCH_LOG` environment variable (e.g. "info", "debug")
//! 4. default to `info`
//!
//! The console layer writes colored output to STDERR. When a log file is
//! configured, a second plain-text layer appends to it. Both layers prefix
//! critical events with a `CRITICAL` marker (magenta on the console).

use std::fmt as std_fmt;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::cli::LogLevel;
use crate::events::CRITICAL_FIELD;

pub const LOG_ENV_VAR: &str = "CNCWATCH_LOG";

/// Pick the effective level from the CLI, the config file and the environment.
pub fn resolve_level(cli_level: Option<LogLevel>, config_level: Option<tracing::Level>) -> tracing::Level {
    cli_level
        .map(level_from_log_level)
        .or(config_level)
        .or_else(|| {
            std::env::var(LOG_ENV_VAR)
                .ok()
                .and_then(|s| parse_level_str(&s))
        })
        .unwrap_or(tracing::Level::INFO)
}

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(level: tracing::Level, log_file: Option<&Path>) -> Result<()> {
    let filter = LevelFilter::from_level(level);

    let console = fmt::layer()
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .event_format(CriticalMarker::new(fmt::format().with_target(false)))
        .with_filter(filter);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {:?}", parent))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {:?}", path))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .event_format(CriticalMarker::new(fmt::format().with_target(false)))
                    .with_filter(filter),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .context("installing global tracing subscriber")?;

    Ok(())
}

/// Event formatter that marks critical events, then defers to `inner`.
#[derive(Debug, Clone)]
pub struct CriticalMarker<F> {
    inner: F,
}

impl<F> CriticalMarker<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<S, N, F> FormatEvent<S, N> for CriticalMarker<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std_fmt::Result {
        if is_critical(event) {
            if writer.has_ansi_escapes() {
                write!(writer, "\x1b[1;35mCRITICAL\x1b[0m ")?;
            } else {
                write!(writer, "CRITICAL ")?;
            }
        }
        self.inner.format_event(ctx, writer, event)
    }
}

fn is_critical(event: &Event<'_>) -> bool {
    struct Flag(bool);

    impl Visit for Flag {
        fn record_bool(&mut self, field: &Field, value: bool) {
            if field.name() == CRITICAL_FIELD {
                self.0 = value;
            }
        }

        fn record_debug(&mut self, _field: &Field, _value: &dyn std_fmt::Debug) {}
    }

    let mut flag = Flag(false);
    event.record(&mut flag);
    flag.0
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" | "critical" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}

// src/events/mod.rs

//! Severity-leveled event sink.
//!
//! Components never talk to the global logger by name; they receive an
//! `Arc<dyn EventSink>` at construction time. Production code passes a
//! [`TracingSink`], tests pass a [`memory::MemorySink`] and inspect what was
//! emitted.

use std::fmt::{self, Debug};

pub mod memory;

pub use memory::{EventRecord, MemorySink};

/// Severity of an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Append-only sink for human-readable events.
///
/// Implementations must be safe to call concurrently from the observer
/// thread and the foreground thread.
pub trait EventSink: Send + Sync + Debug {
    fn emit(&self, severity: Severity, message: &str);
}

/// Field set on `tracing` events that carry [`Severity::Critical`].
pub const CRITICAL_FIELD: &str = "critical";

/// Sink that forwards every event to `tracing`.
///
/// `tracing` has no level above `ERROR`, so critical events are logged as
/// errors tagged with `critical = true` (see [`CRITICAL_FIELD`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!("{message}"),
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
            Severity::Critical => tracing::error!(critical = true, "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_are_ordered() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn severity_display_matches_log_labels() {
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
    }
}

// src/events/memory.rs

use std::sync::{Arc, Mutex, MutexGuard};

use super::{EventSink, Severity};

/// One captured event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub severity: Severity,
    pub message: String,
}

/// In-memory sink that keeps every emitted event.
///
/// Cloning shares the underlying buffer, so a test can hand one clone to the
/// session and keep another for assertions.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<EventRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EventRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of everything emitted so far.
    pub fn records(&self) -> Vec<EventRecord> {
        self.lock().clone()
    }

    pub fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|r| r.severity == severity)
            .map(|r| r.message.clone())
            .collect()
    }

    /// Number of events at `severity` whose message contains `needle`.
    pub fn count_containing(&self, severity: Severity, needle: &str) -> usize {
        self.lock()
            .iter()
            .filter(|r| r.severity == severity && r.message.contains(needle))
            .count()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, severity: Severity, message: &str) {
        self.lock().push(EventRecord {
            severity,
            message: message.to_string(),
        });
    }
}

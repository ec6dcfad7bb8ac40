//! Injectable diagnostic sink for queue, bus and runner internals
//!
//! Mutating operations report noteworthy conditions (rejections, structural
//! corruption, dispatch failures) through a sink chosen at construction.
//! Production code uses [`LogSink`], which forwards to the `log` facade;
//! tests inject [`MemorySink`] and assert on the captured records instead of
//! scraping process output.

use std::sync::{Arc, Mutex};

/// Severity of a diagnostic record, mirroring the log facade levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

impl From<Severity> for log::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Trace => log::Level::Trace,
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

/// A single diagnostic emitted by a component
#[derive(Debug, Clone)]
pub struct DiagnosticRecord {
    pub severity: Severity,
    /// Emitting component, used as the log target (e.g. "actionq::queue")
    pub component: &'static str,
    pub message: String,
}

/// Destination for diagnostic records
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, record: DiagnosticRecord);
}

/// Default sink: forwards every record to the `log` facade
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&self, record: DiagnosticRecord) {
        log::log!(
            target: record.component,
            log::Level::from(record.severity),
            "{}",
            record.message
        );
    }
}

/// Capturing sink for tests
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<DiagnosticRecord>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// True if any record at the given severity contains the fragment
    pub fn contains(&self, severity: Severity, fragment: &str) -> bool {
        self.records()
            .iter()
            .any(|r| r.severity == severity && r.message.contains(fragment))
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, record: DiagnosticRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

/// Shared sink handle used throughout the crate
pub type SharedSink = Arc<dyn DiagnosticSink>;

/// The production default
pub fn default_sink() -> SharedSink {
    Arc::new(LogSink)
}

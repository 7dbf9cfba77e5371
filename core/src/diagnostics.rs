//! Leveled diagnostics emitted while extracting dependencies.
//!
//! Parsers never log through a global logger; they are handed a
//! [`DiagnosticSink`] so callers decide where messages go.

use std::sync::{Mutex, PoisonError};

pub use tracing::Level;

/// A single leveled message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Destination for diagnostics produced during extraction
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);

    fn debug(&self, message: String) {
        self.emit(Diagnostic::new(Level::DEBUG, message));
    }

    fn info(&self, message: String) {
        self.emit(Diagnostic::new(Level::INFO, message));
    }

    fn warn(&self, message: String) {
        self.emit(Diagnostic::new(Level::WARN, message));
    }

    fn error(&self, message: String) {
        self.emit(Diagnostic::new(Level::ERROR, message));
    }
}

/// Forwards diagnostics to `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let message = diagnostic.message;
        match diagnostic.level {
            Level::TRACE => tracing::trace!("{message}"),
            Level::DEBUG => tracing::debug!("{message}"),
            Level::INFO => tracing::info!("{message}"),
            Level::WARN => tracing::warn!("{message}"),
            Level::ERROR => tracing::error!("{message}"),
        }
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// Keeps diagnostics in memory so they can be inspected later
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages emitted at exactly `level`
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.diagnostics()
            .into_iter()
            .filter(|d| d.level == level)
            .map(|d| d.message)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

//! The minimal collaborator the algebra engine talks to for warnings and errors.
//!
//! The full logging/severity/console-appender subsystem this project is normally
//! wired into is out of scope here; everything downstream only ever sees this
//! narrow trait, so it can be swapped for a real logger, a test spy, or silence.

use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::Local;
use once_cell::sync::Lazy;

/// Collaborator for non-fatal diagnostic messages raised by decompositions,
/// the parser and the scheduler.
pub trait Diagnostics: Send + Sync {
    /// Informational message; no condition, just a notable event (e.g. the
    /// scheduler starting).
    fn info(&self, message: &str);
    /// A recoverable condition the caller should know about (e.g. a singular
    /// matrix, a ragged CSV row accepted with padding).
    fn warn(&self, message: &str);
    /// A condition serious enough that the operation could not complete, but
    /// that still surfaces through a `Result` rather than a panic.
    fn error(&self, message: &str);
}

/// Writes timestamped lines to stdout/stderr. The default collaborator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleDiagnostics;

impl Diagnostics for ConsoleDiagnostics {
    fn info(&self, message: &str) {
        println!("[{}] INFO  {}", Local::now().format("%H:%M:%S%.3f"), message);
    }

    fn warn(&self, message: &str) {
        eprintln!("[{}] WARN  {}", Local::now().format("%H:%M:%S%.3f"), message);
    }

    fn error(&self, message: &str) {
        eprintln!("[{}] ERROR {}", Local::now().format("%H:%M:%S%.3f"), message);
    }
}

/// Discards every message. Useful in tests that assert on return values only.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Records every message it receives, in order. Intended for assertions in
/// tests that care about *which* warning fired, not just its side effect.
#[derive(Default)]
pub struct RecordingDiagnostics {
    messages: RwLock<Vec<(Severity, String)>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.read().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(s, _)| *s == Severity::Warn)
            .map(|(_, m)| m)
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn info(&self, message: &str) {
        self.messages
            .write()
            .unwrap()
            .push((Severity::Info, message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.messages
            .write()
            .unwrap()
            .push((Severity::Warn, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages
            .write()
            .unwrap()
            .push((Severity::Error, message.to_string()));
    }
}

impl fmt::Debug for RecordingDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingDiagnostics")
            .field("messages", &self.messages())
            .finish()
    }
}

static DEFAULT_DIAGNOSTICS: Lazy<RwLock<Arc<dyn Diagnostics>>> =
    Lazy::new(|| RwLock::new(Arc::new(ConsoleDiagnostics)));

/// Returns the process-wide default collaborator (a `ConsoleDiagnostics` until
/// overridden).
pub fn default_diagnostics() -> Arc<dyn Diagnostics> {
    DEFAULT_DIAGNOSTICS.read().unwrap().clone()
}

/// Replaces the process-wide default collaborator. Intended for boundary
/// adapters (CLI wrappers, test harnesses) to install their own sink.
pub fn set_default_diagnostics(diagnostics: Arc<dyn Diagnostics>) {
    *DEFAULT_DIAGNOSTICS.write().unwrap() = diagnostics;
}

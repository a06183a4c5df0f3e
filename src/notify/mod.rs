//! Transient toast messages.

use parking_lot::Mutex;

pub const DEFAULT_TOAST_MS: u64 = 2_000;

pub trait Notifier: Send + Sync {
    /// Fire-and-forget; implementations must not block.
    fn show(&self, message: &str, duration_ms: u64);
}

/// Routes toasts into the log. Used when no UI is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show(&self, message: &str, duration_ms: u64) {
        tracing::info!(duration_ms, "toast: {message}");
    }
}

/// Prints toasts to stderr for the command-line front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show(&self, message: &str, _duration_ms: u64) {
        eprintln!("{} {message}", console::style("▸").magenta().bold());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub duration_ms: u64,
}

/// Keeps every toast shown so embedders (and tests) can inspect them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.shown.lock().clone()
    }

    pub fn last_message(&self) -> Option<String> {
        self.shown.lock().last().map(|t| t.message.clone())
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, message: &str, duration_ms: u64) {
        self.shown.lock().push(Toast {
            message: message.to_string(),
            duration_ms,
        });
    }
}

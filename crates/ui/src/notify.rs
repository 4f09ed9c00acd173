//! Transient user notifications.

use serde::{Deserialize, Serialize};

/// The visual category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Sink for transient notifications (toasts, status bar messages).
///
/// Delivery is fire-and-forget; the engine never waits on a notification.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);

    fn info(&self, message: &str) {
        self.notify(Severity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.notify(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(Severity::Error, message);
    }
}

//! User-visible notifications.
//!
//! Controllers and forms receive a [`Notifier`] instead of reaching for a
//! global toast queue, so the front end decides how messages are shown.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{error, info};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification {
            kind: NotificationKind::Success,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Notification {
            kind: NotificationKind::Error,
            message: message.to_string(),
        });
    }
}

/// Prints notifications to the terminal and mirrors them into the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                info!(message = %notification.message, "notification");
                println!("✔ {}", notification.message);
            }
            NotificationKind::Error => {
                error!(message = %notification.message, "notification");
                eprintln!("✖ {}", notification.message);
            }
        }
    }
}

/// Keeps every notification in memory, in the order received.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    received: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|received| received.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.all().pop()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(NotificationKind::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.messages(NotificationKind::Success)
    }

    fn messages(&self, kind: NotificationKind) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut received) = self.received.lock() {
            received.push(notification);
        }
    }
}

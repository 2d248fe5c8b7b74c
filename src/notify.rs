use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Serialize, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Destructive,
}

#[derive(Debug, Serialize, Clone, Eq, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Collects the toasts raised while handling one page request.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn into_inner(self) -> Vec<Notification> {
        self.entries.into_inner().unwrap_or_default()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
            Severity::Destructive => tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
        }
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(notification);
        }
    }
}

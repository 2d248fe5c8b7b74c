use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::models::{connector_label_name, SearchSpaceId, SubmissionRequest};
use crate::notify::{Notification, Notifier};
use crate::services::connectors::ConnectorRegistrar;

pub type SuccessCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SkipReason {
    EmptySecret,
    InFlight,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SubmitOutcome {
    Skipped(SkipReason),
    Connected,
    Failed(String),
}

pub struct SubmitContext<'a> {
    pub registrar: &'a dyn ConnectorRegistrar,
    pub notifier: &'a dyn Notifier,
    pub session: Option<&'a str>,
}

/// Collects one API key and registers it with the backend.
pub struct SingleKeyForm {
    connector_type: String,
    label: String,
    search_space_id: SearchSpaceId,
    on_success: Option<SuccessCallback>,
    secret: RwLock<String>,
    in_flight: AtomicBool,
}

impl SingleKeyForm {
    pub fn new(connector_type: &str, label: &str, search_space_id: SearchSpaceId) -> Self {
        Self {
            connector_type: connector_type.to_string(),
            label: label.to_string(),
            search_space_id,
            on_success: None,
            secret: RwLock::new(String::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn on_success(mut self, callback: SuccessCallback) -> Self {
        self.on_success = Some(callback);
        self
    }

    pub fn set_secret(&self, value: impl Into<String>) {
        if let Ok(mut secret) = self.secret.write() {
            *secret = value.into();
        }
    }

    pub fn has_secret(&self) -> bool {
        self.secret
            .read()
            .map(|secret| !secret.is_empty())
            .unwrap_or(false)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn can_submit(&self) -> bool {
        self.has_secret() && !self.is_in_flight()
    }

    pub async fn submit(&self, ctx: SubmitContext<'_>) -> SubmitOutcome {
        let secret = match self.secret.read() {
            Ok(secret) if !secret.is_empty() => secret.clone(),
            _ => return SubmitOutcome::Skipped(SkipReason::EmptySecret),
        };
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!(connector_type = %self.connector_type, "submission already in flight");
            return SubmitOutcome::Skipped(SkipReason::InFlight);
        };

        let request = SubmissionRequest::single_key(&self.connector_type, self.search_space_id, &secret);
        match ctx.registrar.register(&request, ctx.session).await {
            Ok(()) => {
                ctx.notifier.notify(Notification::success(
                    "Success!",
                    format!(
                        "{} connector added successfully.",
                        connector_label_name(&self.label)
                    ),
                ));
                if let Some(callback) = &self.on_success {
                    callback();
                }
                info!(
                    connector_type = %self.connector_type,
                    search_space_id = %self.search_space_id,
                    "single-key connector added"
                );
                SubmitOutcome::Connected
            }
            Err(error) => {
                let message = error.message().to_string();
                ctx.notifier
                    .notify(Notification::destructive("Error adding connector", message.clone()));
                SubmitOutcome::Failed(message)
            }
        }
    }
}

impl fmt::Debug for SingleKeyForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleKeyForm")
            .field("connector_type", &self.connector_type)
            .field("label", &self.label)
            .field("search_space_id", &self.search_space_id)
            .field("has_secret", &self.has_secret())
            .field("in_flight", &self.is_in_flight())
            .finish()
    }
}

/// Clears the in-flight flag when dropped, including when the submit future is cancelled.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

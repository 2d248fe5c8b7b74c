use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use tracing::{info, warn};

use crate::models::SubmissionRequest;

pub const REGISTRATION_PATH: &str = "/api/v1/search-source-connectors/";

#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
pub enum RegistrationError {
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("{0}")]
    Transport(String),
}

impl RegistrationError {
    pub fn message(&self) -> &str {
        match self {
            RegistrationError::Rejected { message, .. } => message,
            RegistrationError::Transport(message) => message,
        }
    }
}

#[async_trait]
pub trait ConnectorRegistrar: Send + Sync {
    /// `session` is the caller's cookie header, forwarded as-is.
    async fn register(
        &self,
        request: &SubmissionRequest,
        session: Option<&str>,
    ) -> Result<(), RegistrationError>;
}

/// User-facing text for a rejected registration. The status text is used only when the
/// body is not JSON at all.
pub fn error_message(status: StatusCode, body: &[u8]) -> String {
    let fallback = || format!("Request failed with status {}", status.as_u16());
    let value = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(_) => {
            return status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(fallback)
        }
    };
    match value.get("message") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => fallback(),
        Some(Value::String(message)) if message.is_empty() => fallback(),
        Some(Value::String(message)) => message.clone(),
        Some(Value::Number(number)) if number.as_f64() == Some(0.0) => fallback(),
        Some(other) => other.to_string(),
    }
}

#[derive(Clone)]
pub struct HttpRegistrar {
    client: Client,
    endpoint: String,
}

impl HttpRegistrar {
    pub fn new(backend_url: &str) -> Self {
        Self::with_client(Client::new(), backend_url)
    }

    pub fn with_client(client: Client, backend_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", backend_url.trim_end_matches('/'), REGISTRATION_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ConnectorRegistrar for HttpRegistrar {
    async fn register(
        &self,
        request: &SubmissionRequest,
        session: Option<&str>,
    ) -> Result<(), RegistrationError> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(header::USER_AGENT, "connector-dashboard")
            .json(request);
        if let Some(cookie) = session {
            builder = builder.header(header::COOKIE, cookie);
        }

        let response = builder.send().await.map_err(|err| {
            warn!(error = %err, connector_type = %request.connector_type, "connector registration request failed");
            RegistrationError::Transport(err.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            info!(
                status = %status,
                connector_type = %request.connector_type,
                search_space_id = %request.search_space_id,
                "connector registered"
            );
            return Ok(());
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!(status = %status, %message, "connector registration rejected");
        Err(RegistrationError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_TODOIST_API_URL: &str = "https://api.todoist.com/rest/v2";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid DASHBOARD_ADDR '{value}': {source}")]
    InvalidAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub backend_url: String,
    /// Allow any origin instead of localhost only.
    pub cors_permissive: bool,
    pub todoist_api_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("DASHBOARD_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = addr
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidAddr { value: addr.clone(), source })?;
        let cors_permissive = lookup("CORS_PERMISSIVE")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            backend_url: lookup("BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.into()),
            cors_permissive,
            todoist_api_url: lookup("TODOIST_API_URL")
                .unwrap_or_else(|| DEFAULT_TODOIST_API_URL.into()),
        })
    }
}

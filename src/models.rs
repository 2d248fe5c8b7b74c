use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

const CONNECTOR_SUFFIX: &str = "_CONNECTOR";
const API_KEY_LABEL_SUFFIX: &str = " API Key";

#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct SearchSpaceId(pub i64);

impl fmt::Display for SearchSpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `TODOIST_CONNECTOR` -> `TODOIST_API_KEY`
pub fn config_key(connector_type: &str) -> String {
    format!("{}_API_KEY", connector_type.replacen(CONNECTOR_SUFFIX, "", 1))
}

/// `TODOIST_CONNECTOR` -> `TODOIST Connector`
pub fn connector_display_name(connector_type: &str) -> String {
    let base = connector_type
        .replacen(CONNECTOR_SUFFIX, "", 1)
        .replacen('_', " ", 1);
    format!("{base} Connector")
}

/// `Todoist API Key` -> `Todoist`
pub fn connector_label_name(label: &str) -> String {
    label.replacen(API_KEY_LABEL_SUFFIX, "", 1)
}

#[derive(Serialize, Clone, Eq, PartialEq)]
pub struct SubmissionRequest {
    pub name: String,
    pub connector_type: String,
    pub search_space_id: SearchSpaceId,
    pub config: BTreeMap<String, String>,
}

impl SubmissionRequest {
    pub fn single_key(connector_type: &str, search_space_id: SearchSpaceId, secret: &str) -> Self {
        let mut config = BTreeMap::new();
        config.insert(config_key(connector_type), secret.to_string());
        Self {
            name: connector_display_name(connector_type),
            connector_type: connector_type.to_string(),
            search_space_id,
            config,
        }
    }
}

impl fmt::Debug for SubmissionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: BTreeMap<&str, &str> = self
            .config
            .keys()
            .map(|key| (key.as_str(), "<redacted>"))
            .collect();
        f.debug_struct("SubmissionRequest")
            .field("name", &self.name)
            .field("connector_type", &self.connector_type)
            .field("search_space_id", &self.search_space_id)
            .field("config", &redacted)
            .finish()
    }
}

#[derive(Deserialize)]
pub struct ConnectSecretRequest {
    pub secret: String,
}

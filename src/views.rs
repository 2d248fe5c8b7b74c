use serde::Serialize;

use crate::form::SingleKeyForm;
use crate::models::SearchSpaceId;
use crate::services::catalog::{Catalog, ConnectorRecord, ConnectorStatus, Submission};

pub const NOT_FOUND_MESSAGE: &str = "Connector data could not be loaded.";
pub const COMING_SOON_MESSAGE: &str =
    "This connector is coming soon. Configuration will be available once released.";
pub const SECRET_PLACEHOLDER: &str = "Enter your API key";

pub fn connectors_href(search_space_id: SearchSpaceId) -> String {
    format!("/dashboard/{search_space_id}/connectors")
}

pub fn add_connector_href(search_space_id: SearchSpaceId) -> String {
    format!("/dashboard/{search_space_id}/connectors/add")
}

pub fn connector_detail_href(search_space_id: SearchSpaceId, connector_id: &str) -> String {
    format!("/dashboard/{search_space_id}/connectors/add/{connector_id}")
}

#[derive(Debug, Serialize, Clone, Eq, PartialEq)]
pub struct Link {
    pub label: String,
    pub href: String,
}

impl Link {
    fn back_to_connectors(search_space_id: SearchSpaceId) -> Self {
        Self {
            label: "Back to Connectors".into(),
            href: add_connector_href(search_space_id),
        }
    }
}

/// A button that is rendered but never issues a request.
#[derive(Debug, Serialize, Clone, Eq, PartialEq)]
pub struct StubAction {
    pub label: String,
    pub variant: &'static str,
}

#[derive(Debug, Serialize, Clone, Eq, PartialEq)]
pub struct ConnectorHeader {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub status: ConnectorStatus,
    pub status_label: &'static str,
}

#[derive(Debug, Serialize, Clone, Eq, PartialEq)]
pub struct SingleKeyFormView {
    pub connector_type: String,
    pub field_id: String,
    pub label: String,
    pub placeholder: &'static str,
    pub has_secret: bool,
    pub submitting: bool,
    pub submit_label: &'static str,
    pub disabled: bool,
    pub redirect_on_success: String,
}

#[derive(Debug, Serialize, Clone, Eq, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Configuration {
    SingleKeyForm(SingleKeyFormView),
    Placeholder { message: String, action: StubAction },
    ComingSoon { message: &'static str },
    Connected { message: String, action: StubAction },
}

#[derive(Debug, Serialize, Clone, Eq, PartialEq)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum DetailView {
    Error {
        message: &'static str,
        back: Link,
    },
    Connector {
        back: Link,
        header: ConnectorHeader,
        search_space_id: SearchSpaceId,
        connector_id: String,
        configuration: Configuration,
    },
}

impl DetailView {
    pub fn configuration(&self) -> Option<&Configuration> {
        match self {
            DetailView::Error { .. } => None,
            DetailView::Connector { configuration, .. } => Some(configuration),
        }
    }
}

/// Renders the detail page body. A missing connector renders inline rather than failing.
pub fn render_detail(
    catalog: &Catalog,
    search_space_id: SearchSpaceId,
    connector_id: &str,
    form: Option<&SingleKeyForm>,
) -> DetailView {
    let Some(record) = catalog.lookup(connector_id) else {
        return DetailView::Error {
            message: NOT_FOUND_MESSAGE,
            back: Link::back_to_connectors(search_space_id),
        };
    };

    DetailView::Connector {
        back: Link::back_to_connectors(search_space_id),
        header: ConnectorHeader {
            title: record.title.clone(),
            description: record.description.clone(),
            icon: record.icon.clone(),
            status: record.status,
            status_label: record.status.label(),
        },
        search_space_id,
        connector_id: connector_id.to_string(),
        configuration: configuration_for(record, search_space_id, form),
    }
}

fn configuration_for(
    record: &ConnectorRecord,
    search_space_id: SearchSpaceId,
    form: Option<&SingleKeyForm>,
) -> Configuration {
    match (record.status, &record.submission) {
        (ConnectorStatus::Available, Submission::SingleKey { connector_type, label }) => {
            let has_secret = form.is_some_and(SingleKeyForm::has_secret);
            let submitting = form.is_some_and(SingleKeyForm::is_in_flight);
            Configuration::SingleKeyForm(SingleKeyFormView {
                connector_type: connector_type.clone(),
                field_id: format!("{connector_type}-secret"),
                label: label.clone(),
                placeholder: SECRET_PLACEHOLDER,
                has_secret,
                submitting,
                submit_label: if submitting { "Connecting…" } else { "Connect" },
                disabled: submitting || !has_secret,
                redirect_on_success: connectors_href(search_space_id),
            })
        }
        (ConnectorStatus::Available, Submission::Stub | Submission::None) => {
            Configuration::Placeholder {
                message: format!(
                    "Connection form for \"{}\" will be displayed here.",
                    record.title
                ),
                action: StubAction {
                    label: format!("Connect {}", record.title),
                    variant: "default",
                },
            }
        }
        (ConnectorStatus::ComingSoon, _) => Configuration::ComingSoon {
            message: COMING_SOON_MESSAGE,
        },
        (ConnectorStatus::Connected, _) => Configuration::Connected {
            message: format!("Manage your existing \"{}\" connection.", record.title),
            action: StubAction {
                label: "Disconnect".into(),
                variant: "destructive",
            },
        },
    }
}

#[derive(Debug, Serialize)]
pub struct ConnectorCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub status: ConnectorStatus,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct CategorySection {
    pub id: String,
    pub title: String,
    pub connectors: Vec<ConnectorCard>,
}

#[derive(Debug, Serialize)]
pub struct ConnectorsListView {
    pub search_space_id: SearchSpaceId,
    pub categories: Vec<CategorySection>,
}

pub fn render_connectors_list(catalog: &Catalog, search_space_id: SearchSpaceId) -> ConnectorsListView {
    let categories = catalog
        .categories()
        .iter()
        .map(|category| CategorySection {
            id: category.id.clone(),
            title: category.title.clone(),
            connectors: category
                .connectors
                .iter()
                .map(|connector| ConnectorCard {
                    id: connector.id.clone(),
                    title: connector.title.clone(),
                    description: connector.description.clone(),
                    icon: connector.icon.clone(),
                    status: connector.status,
                    href: connector_detail_href(search_space_id, &connector.id),
                })
                .collect(),
        })
        .collect();

    ConnectorsListView {
        search_space_id,
        categories,
    }
}

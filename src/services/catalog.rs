use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use serde::Serialize;

pub const TODOIST_CONNECTOR_TYPE: &str = "TODOIST_CONNECTOR";

#[derive(Debug, Serialize, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectorStatus {
    Available,
    ComingSoon,
    Connected,
}

impl ConnectorStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ConnectorStatus::Available => "available",
            ConnectorStatus::ComingSoon => "coming-soon",
            ConnectorStatus::Connected => "connected",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ConnectorStatus::Available => "Available",
            ConnectorStatus::ComingSoon => "Coming Soon",
            ConnectorStatus::Connected => "Connected",
        }
    }
}

/// How a connector collects credentials once it is available.
#[derive(Debug, Serialize, Clone, Eq, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Submission {
    SingleKey {
        connector_type: String,
        label: String,
    },
    Stub,
    None,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConnectorRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub status: ConnectorStatus,
    pub submission: Submission,
}

impl ConnectorRecord {
    pub fn new(
        id: &str,
        title: &str,
        description: &str,
        icon: &str,
        status: ConnectorStatus,
    ) -> Self {
        let submission = match status {
            ConnectorStatus::Available => Submission::Stub,
            ConnectorStatus::ComingSoon | ConnectorStatus::Connected => Submission::None,
        };
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            status,
            submission,
        }
    }

    pub fn single_key(mut self, connector_type: &str, label: &str) -> Self {
        self.submission = Submission::SingleKey {
            connector_type: connector_type.to_string(),
            label: label.to_string(),
        };
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ConnectorCategory {
    pub id: String,
    pub title: String,
    pub connectors: Vec<ConnectorRecord>,
}

impl ConnectorCategory {
    pub fn new(id: &str, title: &str, connectors: Vec<ConnectorRecord>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            connectors,
        }
    }
}

#[derive(Clone, Debug, Serialize, Eq, PartialEq)]
pub struct ConnectorParam {
    pub connector_id: String,
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum CatalogError {
    #[error("connector id '{0}' appears more than once in the catalog")]
    DuplicateId(String),
}

#[derive(Clone, Debug)]
pub struct Catalog {
    categories: Vec<ConnectorCategory>,
}

impl Catalog {
    pub fn new(categories: Vec<ConnectorCategory>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for connector in categories.iter().flat_map(|category| &category.connectors) {
            if !seen.insert(connector.id.as_str()) {
                return Err(CatalogError::DuplicateId(connector.id.clone()));
            }
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[ConnectorCategory] {
        &self.categories
    }

    pub fn connectors(&self) -> impl Iterator<Item = &ConnectorRecord> {
        self.categories
            .iter()
            .flat_map(|category| category.connectors.iter())
    }

    pub fn lookup(&self, id: &str) -> Option<&ConnectorRecord> {
        self.connectors().find(|connector| connector.id == id)
    }

    pub fn all_identifiers(&self) -> Vec<&str> {
        self.connectors()
            .map(|connector| connector.id.as_str())
            .collect()
    }

    pub fn connector_params(&self) -> Vec<ConnectorParam> {
        self.connectors()
            .map(|connector| ConnectorParam {
                connector_id: connector.id.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connectors().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static BUILTIN: LazyLock<Arc<Catalog>> = LazyLock::new(|| {
    Arc::new(Catalog {
        categories: builtin_categories(),
    })
});

/// Shared handle to the catalog shipped with the dashboard.
pub fn builtin_catalog() -> Arc<Catalog> {
    BUILTIN.clone()
}

fn builtin_categories() -> Vec<ConnectorCategory> {
    use ConnectorStatus::{Available, ComingSoon};

    vec![
        ConnectorCategory::new(
            "search-engines",
            "Search Engines",
            vec![
                ConnectorRecord::new(
                    "tavily-api",
                    "Tavily API",
                    "Search the web using the Tavily API",
                    "world-www",
                    Available,
                ),
                ConnectorRecord::new(
                    "linkup-api",
                    "Linkup API",
                    "Search the web using the Linkup API",
                    "link-plus",
                    Available,
                ),
            ],
        ),
        ConnectorCategory::new(
            "team-chats",
            "Team Chats",
            vec![
                ConnectorRecord::new(
                    "slack-connector",
                    "Slack",
                    "Connect to your Slack workspace to access messages and channels.",
                    "brand-slack",
                    Available,
                ),
                ConnectorRecord::new(
                    "ms-teams",
                    "Microsoft Teams",
                    "Connect to Microsoft Teams to access your team's conversations.",
                    "brand-windows",
                    ComingSoon,
                ),
                ConnectorRecord::new(
                    "discord-connector",
                    "Discord",
                    "Connect to Discord servers to access messages and channels.",
                    "brand-discord",
                    Available,
                ),
            ],
        ),
        ConnectorCategory::new(
            "project-management",
            "Project Management",
            vec![
                ConnectorRecord::new(
                    "linear-connector",
                    "Linear",
                    "Connect to Linear to search issues, comments and project data.",
                    "layout-kanban",
                    Available,
                ),
                ConnectorRecord::new(
                    "jira-connector",
                    "Jira",
                    "Connect to Jira to search issues, tickets and project data.",
                    "ticket",
                    ComingSoon,
                ),
                ConnectorRecord::new(
                    "todoist-connector",
                    "Todoist",
                    "Connect to Todoist to access tasks, priorities and deadlines.",
                    "checklist",
                    Available,
                )
                .single_key(TODOIST_CONNECTOR_TYPE, "Todoist API Key"),
            ],
        ),
        ConnectorCategory::new(
            "knowledge-bases",
            "Knowledge Bases",
            vec![
                ConnectorRecord::new(
                    "notion-connector",
                    "Notion",
                    "Connect to your Notion workspace to access pages and databases.",
                    "brand-notion",
                    Available,
                ),
                ConnectorRecord::new(
                    "github-connector",
                    "GitHub",
                    "Connect a GitHub PAT to index code and docs from accessible repositories.",
                    "brand-github",
                    Available,
                ),
            ],
        ),
        ConnectorCategory::new(
            "communication",
            "Communication",
            vec![
                ConnectorRecord::new(
                    "gmail",
                    "Gmail",
                    "Connect to your Gmail account to access emails.",
                    "mail",
                    ComingSoon,
                ),
                ConnectorRecord::new(
                    "zoom",
                    "Zoom",
                    "Connect to Zoom to access meeting recordings and transcripts.",
                    "brand-zoom",
                    ComingSoon,
                ),
            ],
        ),
    ]
}

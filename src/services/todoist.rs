use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DEFAULT_TODOIST_API_URL;

#[derive(Debug, thiserror::Error)]
pub enum TodoistError {
    #[error("Todoist token not initialized. Call set_token() first.")]
    TokenNotInitialized,
    #[error("Invalid date format: {0}. Please use YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("No tasks found in the specified date range.")]
    NoTasksInRange,
    #[error("Error fetching tasks: {0}")]
    Request(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TaskDue {
    pub date: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

/// A task as returned by `GET /tasks`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TodoistTask {
    pub id: String,
    pub project_id: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub comment_count: Option<u32>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    pub priority: Option<u8>,
    pub created_at: Option<String>,
    pub due: Option<TaskDue>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FormattedTask {
    pub id: String,
    pub project_id: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub comment_count: Option<u32>,
    pub is_completed: bool,
    pub labels: Vec<String>,
    pub priority: Option<u8>,
    pub created_at: Option<String>,
    pub due_date: Option<String>,
    pub url: Option<String>,
}

#[derive(Clone)]
pub struct TodoistClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl TodoistClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_TODOIST_API_URL.to_string(),
            token,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn auth_header(&self) -> Result<String, TodoistError> {
        match self.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(format!("Bearer {token}")),
            _ => Err(TodoistError::TokenNotInitialized),
        }
    }

    /// Tasks created between `start_date` and the end of `end_date`, both `YYYY-MM-DD`, in UTC.
    /// The REST API cannot list completed tasks by date, so `include_completed` has no effect.
    pub async fn get_tasks_by_date_range(
        &self,
        start_date: &str,
        end_date: &str,
        include_completed: bool,
    ) -> Result<Vec<TodoistTask>, TodoistError> {
        let auth = self.auth_header()?;
        let start = parse_day(start_date)?.and_time(NaiveTime::MIN).and_utc();
        let end = parse_day(end_date)?
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| TodoistError::InvalidDate(end_date.to_string()))?
            .and_utc();
        if include_completed {
            debug!("completed tasks are not available by date range; ignoring include_completed");
        }

        let response = self
            .client
            .get(format!("{}/tasks", self.base_url))
            .header(header::AUTHORIZATION, auth)
            .header(header::USER_AGENT, "connector-dashboard")
            .send()
            .await
            .map_err(|err| TodoistError::Request(err.to_string()))?;
        if !response.status().is_success() {
            return Err(TodoistError::Request(format!(
                "task request failed: {}",
                response.status()
            )));
        }
        let tasks: Vec<TodoistTask> = response
            .json()
            .await
            .map_err(|err| TodoistError::Request(err.to_string()))?;

        let filtered = filter_by_created_at(tasks, start, end)?;
        debug!(count = filtered.len(), start_date, end_date, "filtered todoist tasks");

        if filtered.is_empty() {
            return Err(TodoistError::NoTasksInRange);
        }
        Ok(filtered)
    }
}

/// Keeps tasks created within `[start, end]`. A task without a readable `created_at`
/// fails the whole batch.
fn filter_by_created_at(
    tasks: Vec<TodoistTask>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<TodoistTask>, TodoistError> {
    let mut filtered = Vec::new();
    for task in tasks {
        let created = task
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| {
                TodoistError::Request(format!(
                    "invalid created_at {:?} on task {}",
                    task.created_at.as_deref().unwrap_or_default(),
                    task.id
                ))
            })?
            .with_timezone(&Utc);
        if start <= created && created <= end {
            filtered.push(task);
        }
    }
    Ok(filtered)
}

fn parse_day(value: &str) -> Result<NaiveDate, TodoistError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| TodoistError::InvalidDate(format!("{value}: {err}")))
}

/// RFC 3339, or a bare ISO timestamp taken as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok().or_else(|| {
        value
            .parse::<NaiveDateTime>()
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

pub fn format_task(raw: &TodoistTask) -> FormattedTask {
    FormattedTask {
        id: raw.id.clone(),
        project_id: raw.project_id.clone(),
        content: raw.content.clone(),
        description: raw.description.clone(),
        comment_count: raw.comment_count,
        is_completed: raw.is_completed,
        labels: raw.labels.clone(),
        priority: raw.priority,
        created_at: raw.created_at.clone(),
        due_date: raw.due.as_ref().and_then(|due| due.date.clone()),
        url: raw.url.clone(),
    }
}

fn priority_label(priority: u8) -> &'static str {
    match priority {
        1 => "P4 (Low)",
        2 => "P3 (Medium)",
        3 => "P2 (High)",
        4 => "P1 (Urgent)",
        _ => "Unknown",
    }
}

pub fn format_task_to_markdown(task: &FormattedTask) -> String {
    let title = task.content.as_deref().unwrap_or("No Title");
    let mut markdown = format!("# {title}\n\n");

    if task.is_completed {
        markdown.push_str("**Status:** Completed\n");
    } else {
        markdown.push_str("**Status:** Open\n");
    }
    if let Some(due) = task.due_date.as_deref().filter(|due| !due.is_empty()) {
        markdown.push_str(&format!("**Due:** {due}\n"));
    }
    if let Some(priority) = task.priority.filter(|priority| *priority != 0) {
        markdown.push_str(&format!("**Priority:** {}\n", priority_label(priority)));
    }
    if !task.labels.is_empty() {
        markdown.push_str(&format!("**Labels:** {}\n", task.labels.join(", ")));
    }
    if let Some(created) = task.created_at.as_deref().filter(|created| !created.is_empty()) {
        markdown.push_str(&format!("**Created:** {}\n\n", format_date(created)));
    }
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        markdown.push_str(&format!("## Description\n\n{description}\n\n"));
    }
    if let Some(count) = task.comment_count.filter(|count| *count > 0) {
        markdown.push_str(&format!("**Comments:** {count}\n\n"));
    }

    markdown
}

pub fn format_date(iso_date: &str) -> String {
    if iso_date.is_empty() {
        return "Unknown date".to_string();
    }
    match parse_timestamp(iso_date) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => iso_date.to_string(),
    }
}

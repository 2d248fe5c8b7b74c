use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use connector_dashboard::config::AppConfig;
use connector_dashboard::services::todoist::{format_task, format_task_to_markdown, TodoistClient};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env().expect("invalid configuration");
    let token = std::env::var("TODOIST_API_KEY").ok();
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let start_date = std::env::var("START_DATE").unwrap_or_else(|_| today.clone());
    let end_date = std::env::var("END_DATE").unwrap_or(today);

    let client = TodoistClient::new(token).with_base_url(&config.todoist_api_url);
    match client
        .get_tasks_by_date_range(&start_date, &end_date, false)
        .await
    {
        Ok(tasks) => {
            tracing::info!(count = tasks.len(), %start_date, %end_date, "exporting todoist tasks");
            for task in &tasks {
                println!("{}", format_task_to_markdown(&format_task(task)));
            }
        }
        Err(error) => {
            tracing::error!(%error, "failed to export todoist tasks");
            std::process::exit(1);
        }
    }
}

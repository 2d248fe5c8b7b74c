pub mod catalog;
pub mod connectors;
pub mod todoist;

pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod notify;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/connectors", get(routes::catalog::list_catalog))
        .route(
            "/api/connectors/params",
            get(routes::catalog::list_connector_params),
        )
        .route(
            "/dashboard/{search_space_id}/connectors",
            get(routes::dashboard::connectors_list),
        )
        .route(
            "/dashboard/{search_space_id}/connectors/add/{connector_id}",
            get(routes::dashboard::connector_detail).post(routes::dashboard::connect_connector),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

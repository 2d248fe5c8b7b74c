use axum::{extract::State, Json};

use crate::{
    services::catalog::{ConnectorCategory, ConnectorParam},
    state::AppState,
};

pub async fn list_catalog(State(state): State<AppState>) -> Json<Vec<ConnectorCategory>> {
    Json(state.catalog.categories().to_vec())
}

pub async fn list_connector_params(State(state): State<AppState>) -> Json<Vec<ConnectorParam>> {
    Json(state.catalog.connector_params())
}

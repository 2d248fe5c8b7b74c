use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::ApiError,
    form::{SkipReason, SubmitContext, SubmitOutcome},
    models::{ConnectSecretRequest, SearchSpaceId},
    notify::{Notification, NotificationLog},
    services::catalog::{ConnectorStatus, Submission},
    state::AppState,
    views::{connectors_href, render_connectors_list, render_detail, ConnectorsListView, DetailView},
};

#[derive(Serialize)]
pub struct ConnectorPage {
    pub view: DetailView,
    pub notifications: Vec<Notification>,
}

pub async fn connectors_list(
    State(state): State<AppState>,
    Path(search_space_id): Path<SearchSpaceId>,
) -> Json<ConnectorsListView> {
    Json(render_connectors_list(&state.catalog, search_space_id))
}

pub async fn connector_detail(
    State(state): State<AppState>,
    Path((search_space_id, connector_id)): Path<(SearchSpaceId, String)>,
) -> Result<Json<ConnectorPage>, ApiError> {
    if state.catalog.lookup(&connector_id).is_none() {
        return Err(ApiError::not_found("connector", connector_id));
    }

    let form = state.forms.get(search_space_id, &connector_id);
    Ok(Json(ConnectorPage {
        view: render_detail(&state.catalog, search_space_id, &connector_id, form.as_deref()),
        notifications: Vec::new(),
    }))
}

pub async fn connect_connector(
    State(state): State<AppState>,
    Path((search_space_id, connector_id)): Path<(SearchSpaceId, String)>,
    headers: HeaderMap,
    Json(payload): Json<ConnectSecretRequest>,
) -> Result<Response, ApiError> {
    let record = state
        .catalog
        .lookup(&connector_id)
        .ok_or_else(|| ApiError::not_found("connector", connector_id.as_str()))?;

    let (connector_type, label) = match (&record.submission, record.status) {
        (Submission::SingleKey { connector_type, label }, ConnectorStatus::Available) => {
            (connector_type, label)
        }
        _ => {
            return Err(ApiError::BadRequest(format!(
                "{} does not accept a single API key",
                record.title
            )))
        }
    };

    let form = state
        .forms
        .mount(search_space_id, &record.id, connector_type, label);
    form.set_secret(payload.secret);

    let session = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());
    let log = NotificationLog::new();
    let outcome = form
        .submit(SubmitContext {
            registrar: state.registrar.as_ref(),
            notifier: &log,
            session,
        })
        .await;

    // A settled submission unmounts the form; only an in-flight one stays registered.
    let response = match outcome {
        SubmitOutcome::Connected => {
            Redirect::to(&connectors_href(search_space_id)).into_response()
        }
        SubmitOutcome::Skipped(SkipReason::InFlight) => {
            return Err(ApiError::Conflict(
                "a submission for this connector is already in progress".into(),
            ))
        }
        SubmitOutcome::Skipped(SkipReason::EmptySecret) | SubmitOutcome::Failed(_) => {
            Json(ConnectorPage {
                view: render_detail(&state.catalog, search_space_id, &record.id, Some(&form)),
                notifications: log.into_inner(),
            })
            .into_response()
        }
    };
    state.forms.release_if_idle(search_space_id, &record.id, &form);
    Ok(response)
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::Notify;
use tower::ServiceExt;

use connector_dashboard::{
    models::{SearchSpaceId, SubmissionRequest},
    router,
    services::catalog::builtin_catalog,
    services::connectors::{ConnectorRegistrar, RegistrationError},
    state::AppState,
};

struct FakeRegistrar {
    result: Result<(), RegistrationError>,
    calls: AtomicUsize,
    sessions: Mutex<Vec<Option<String>>>,
    gate: Option<Arc<Notify>>,
}

impl FakeRegistrar {
    fn new(result: Result<(), RegistrationError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
            sessions: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    fn gated(gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(()),
            calls: AtomicUsize::new(0),
            sessions: Mutex::new(Vec::new()),
            gate: Some(gate),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectorRegistrar for FakeRegistrar {
    async fn register(
        &self,
        _request: &SubmissionRequest,
        session: Option<&str>,
    ) -> Result<(), RegistrationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sessions.lock().unwrap().push(session.map(str::to_string));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.clone()
    }
}

fn app(registrar: Arc<FakeRegistrar>) -> (Router, AppState) {
    let state = AppState::new(builtin_catalog(), registrar);
    (router(state.clone()), state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn connect(uri: &str, secret: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, "session=abc")
        .body(Body::from(json!({ "secret": secret }).to_string()))
        .unwrap()
}

const TODOIST: &str = "/dashboard/7/connectors/add/todoist-connector";

#[tokio::test]
async fn health_is_ok() {
    let (app, _) = app(FakeRegistrar::new(Ok(())));
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn catalog_params_follow_catalog_order() {
    let (app, _) = app(FakeRegistrar::new(Ok(())));
    let response = app.oneshot(get("/api/connectors/params")).await.unwrap();
    let body = body_json(response).await;
    let params = body.as_array().unwrap();
    assert_eq!(params.len(), 14);
    assert_eq!(params[0], json!({ "connector_id": "tavily-api" }));
}

#[tokio::test]
async fn catalog_lists_categories() {
    let (app, _) = app(FakeRegistrar::new(Ok(())));
    let response = app.oneshot(get("/api/connectors")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body[0]["id"], "search-engines");
    assert_eq!(body[2]["connectors"][1]["status"], "coming-soon");
}

#[tokio::test]
async fn unknown_connector_page_is_not_found() {
    let (app, _) = app(FakeRegistrar::new(Ok(())));
    let response = app
        .oneshot(get("/dashboard/7/connectors/add/nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "connector 'nope' not found");
}

#[tokio::test]
async fn non_numeric_search_space_is_rejected() {
    let registrar = FakeRegistrar::new(Ok(()));
    let (app, state) = app(registrar.clone());
    let response = app
        .clone()
        .oneshot(get("/dashboard/abc/connectors/add/todoist-connector"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(connect("/dashboard/abc/connectors/add/todoist-connector", "tok"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(registrar.calls(), 0);
    assert!(state.forms.is_empty());
}

#[tokio::test]
async fn todoist_page_renders_the_form() {
    let (app, _) = app(FakeRegistrar::new(Ok(())));
    let response = app.oneshot(get(TODOIST)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["view"]["view"], "connector");
    assert_eq!(body["view"]["configuration"]["kind"], "single-key-form");
    assert_eq!(body["view"]["configuration"]["disabled"], true);
    assert_eq!(body["view"]["header"]["status_label"], "Available");
}

#[tokio::test]
async fn jira_page_is_coming_soon() {
    let (app, _) = app(FakeRegistrar::new(Ok(())));
    let response = app
        .oneshot(get("/dashboard/7/connectors/add/jira-connector"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let configuration = &body["view"]["configuration"];
    assert_eq!(configuration["kind"], "coming-soon");
    assert!(configuration.get("action").is_none());
}

#[tokio::test]
async fn successful_connect_redirects_to_the_list() {
    let registrar = FakeRegistrar::new(Ok(()));
    let (app, state) = app(registrar.clone());
    let response = app.oneshot(connect(TODOIST, "tok-123")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/dashboard/7/connectors"
    );
    assert_eq!(registrar.calls(), 1);
    assert_eq!(
        registrar.sessions.lock().unwrap()[0].as_deref(),
        Some("session=abc")
    );
    assert!(state.forms.get(SearchSpaceId(7), "todoist-connector").is_none());
}

#[tokio::test]
async fn failed_connect_reports_the_error_and_unmounts_the_form() {
    let registrar = FakeRegistrar::new(Err(RegistrationError::Rejected {
        status: 400,
        message: "bad key".into(),
    }));
    let (app, state) = app(registrar.clone());
    let response = app.oneshot(connect(TODOIST, "wrong")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["notifications"][0]["severity"], "destructive");
    assert_eq!(body["notifications"][0]["description"], "bad key");
    assert_eq!(body["view"]["configuration"]["has_secret"], true);
    assert_eq!(body["view"]["configuration"]["disabled"], false);

    assert!(state.forms.get(SearchSpaceId(7), "todoist-connector").is_none());
    assert!(state.forms.is_empty());
}

#[tokio::test]
async fn rejected_connects_do_not_accumulate_forms() {
    let registrar = FakeRegistrar::new(Err(RegistrationError::Rejected {
        status: 400,
        message: "bad key".into(),
    }));
    let (app, state) = app(registrar.clone());

    for search_space in 0..50 {
        let uri = format!("/dashboard/{search_space}/connectors/add/todoist-connector");
        let response = app.clone().oneshot(connect(&uri, "wrong")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(registrar.calls(), 50);
    assert_eq!(state.forms.len(), 0);
}

#[tokio::test]
async fn empty_secret_is_silently_refused() {
    let registrar = FakeRegistrar::new(Ok(()));
    let (app, state) = app(registrar.clone());
    let response = app.oneshot(connect(TODOIST, "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["notifications"], json!([]));
    assert_eq!(registrar.calls(), 0);
    assert!(state.forms.is_empty());
}

#[tokio::test]
async fn stub_connectors_never_submit() {
    let registrar = FakeRegistrar::new(Ok(()));
    let (app, _) = app(registrar.clone());
    let response = app
        .oneshot(connect("/dashboard/7/connectors/add/slack-connector", "tok"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(registrar.calls(), 0);
}

#[tokio::test]
async fn concurrent_connect_is_rejected_while_in_flight() {
    let gate = Arc::new(Notify::new());
    let registrar = FakeRegistrar::gated(gate.clone());
    let (app, state) = app(registrar.clone());

    let first = tokio::spawn(app.clone().oneshot(connect(TODOIST, "tok")));
    while registrar.calls() == 0 {
        tokio::task::yield_now().await;
    }

    let page = app.clone().oneshot(get(TODOIST)).await.unwrap();
    let body = body_json(page).await;
    assert_eq!(body["view"]["configuration"]["submitting"], true);
    assert_eq!(body["view"]["configuration"]["submit_label"], "Connecting…");

    let second = app.clone().oneshot(connect(TODOIST, "tok")).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(state.forms.len(), 1);

    gate.notify_one();
    let first = first.await.unwrap().unwrap();
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    assert_eq!(registrar.calls(), 1);
    assert!(state.forms.is_empty());
}

#[tokio::test]
async fn list_page_links_details() {
    let (app, _) = app(FakeRegistrar::new(Ok(())));
    let response = app.oneshot(get("/dashboard/7/connectors")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["search_space_id"], 7);
    assert_eq!(
        body["categories"][2]["connectors"][2]["href"],
        "/dashboard/7/connectors/add/todoist-connector"
    );
}

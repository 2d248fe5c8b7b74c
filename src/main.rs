use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use connector_dashboard::{
    config::AppConfig, router, services::catalog::builtin_catalog,
    services::connectors::HttpRegistrar, state::AppState,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("invalid configuration");
    let catalog = builtin_catalog();
    tracing::info!(
        connectors = catalog.len(),
        backend = %config.backend_url,
        "connector catalog loaded"
    );

    let state = AppState::new(catalog, Arc::new(HttpRegistrar::new(&config.backend_url)));

    let cors = if config.cors_permissive {
        tracing::warn!("CORS: permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("connector dashboard listening on {}", config.bind_addr);

    axum::serve(
        tokio::net::TcpListener::bind(config.bind_addr)
            .await
            .expect("failed to bind address"),
        app,
    )
    .await
    .expect("server error");
}

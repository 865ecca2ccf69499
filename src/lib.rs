pub mod commands;
pub mod config;
pub mod conversation;
pub mod doc_processor;
pub mod error;
pub mod llm;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::state::AppState;

/// Build the HTTP surface. Routes are served with and without a trailing slash.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(commands::health))
        .route("/chat", post(commands::chat::chat))
        .route("/chat/", post(commands::chat::chat))
        .route("/upload", post(commands::upload::upload))
        .route("/upload/", post(commands::upload::upload))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(cors)
        .with_state(state)
}

/// Bind to the configured address and serve until the process is stopped.
pub async fn run(config: Config) -> std::io::Result<()> {
    if config.api_key.is_none() {
        tracing::warn!("no API key configured; every request will fail with \"Missing API Key\"");
    }

    let addr = config.bind_addr;
    let app = router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await
}

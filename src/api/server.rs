//! Axum server setup and startup

use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::routes::create_router;
use super::AppState;
use crate::config::ServerConfig;

/// Run the API server with the given shared state
///
/// This function is intended to be run on a tokio runtime. It blocks until
/// ctrl-c is received, then shuts down gracefully.
pub async fn run_server(config: &ServerConfig, state: AppState) -> Result<(), std::io::Error> {
    // Enable CORS for cross-origin requests (browser dashboard clients)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(
        "API server listening on http://{}:{}",
        config.host, config.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("API server shutting down gracefully");
}

//! HTTP server — Axum front door for the assistant.
//!
//! Serves a JSON API plus a self-contained HTML page.
//! CORS enabled for local development.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use routes::AppState;

/// The embedded page (compiled into the binary).
const INDEX_HTML: &str = include_str!("templates/index.html");

/// Run the API server until shutdown. Binds all interfaces on `port`.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "API server starting on http://localhost:{port}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install ctrl-c handler");
    }
    info!("Shutdown signal received");
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().expect("static origin"))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // API routes
        .route("/api/prices", post(routes::post_prices))
        .route("/api/advice", post(routes::post_advice))
        .route("/api/schemes", post(routes::post_schemes))
        .route("/api/suggestions", post(routes::post_suggestions))
        .route("/api/weather", get(routes::get_weather))
        .route("/health", get(routes::health))
        // Page
        .route("/", get(serve_index))
        .layer(cors)
        .with_state(state)
}

/// Serve the embedded HTML page.
async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

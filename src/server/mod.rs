//! HTTP server for remote deployments
//!
//! Serves the tool registry as a small JSON API. `/health` is always open;
//! everything under `/api` goes through bearer auth and then the per-client
//! rate limiter.

pub mod guards;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use state::AppState;

/// Build the router. Split from [`start_server`] so it can be driven
/// without a socket.
pub fn build_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/api/tools", get(routes::tools::list_tools))
        .route("/api/tools/:name", post(routes::tools::call_tool))
        // Layers run outside-in: auth, then rate limit
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guards::enforce_rate_limit,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guards::require_auth,
        ));

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(cors_origins) {
        app = app.layer(cors);
    }

    app
}

/// CORS is off unless origins are configured.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

/// Bind and serve until the process is stopped.
pub async fn start_server(config: &ServerConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state, &config.cors_origins);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid address {}:{}", config.host, config.port))?;

    if config.auth_token.is_none() {
        warn!("No auth token configured; the API is open to any client");
    }
    info!("Starting EVE University Wiki MCP server on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

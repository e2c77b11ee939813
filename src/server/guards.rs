//! Auth and rate-limit middleware for the API routes

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use super::state::AppState;
use super::types::ErrorResponse;

pub const RATE_LIMITED: &str = "Rate limit exceeded. Please try again later.";

/// Remote address of the caller, or "unknown" when the listener did not
/// record one.
pub fn client_id(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn bearer_token(req: &Request) -> &str {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v).trim())
        .unwrap_or("")
}

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(expected) = state.auth_token.as_deref() {
        if bearer_token(&req) != expected {
            warn!("Unauthorized access attempt from {}", client_id(&req));
            return (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new("Unauthorized")))
                .into_response();
        }
    }
    next.run(req).await
}

pub async fn enforce_rate_limit(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_id(&req);
    if !state.rate_limiter.check(&client).await {
        warn!("Rate limit exceeded for client: {}", client);
        return (StatusCode::TOO_MANY_REQUESTS, Json(ErrorResponse::new(RATE_LIMITED)))
            .into_response();
    }
    next.run(req).await
}

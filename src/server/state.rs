//! Shared state for the HTTP server

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::tools::ToolRegistry;
use crate::wiki::WikiApi;

use super::rate_limit::RateLimiter;

pub struct AppState {
    pub registry: Arc<ToolRegistry>,
    pub wiki: Arc<dyn WikiApi>,
    /// Bearer token; `None` disables auth
    pub auth_token: Option<String>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(registry: Arc<ToolRegistry>, wiki: Arc<dyn WikiApi>, config: &ServerConfig) -> Self {
        Self::with_rate_limiter(
            registry,
            wiki,
            config.auth_token.clone(),
            RateLimiter::new(
                config.rate_limit_requests,
                Duration::from_secs(config.rate_limit_window_secs),
            ),
        )
    }

    pub fn with_rate_limiter(
        registry: Arc<ToolRegistry>,
        wiki: Arc<dyn WikiApi>,
        auth_token: Option<String>,
        rate_limiter: RateLimiter,
    ) -> Self {
        Self {
            registry,
            wiki,
            auth_token: auth_token.filter(|t| !t.is_empty()),
            rate_limiter,
        }
    }
}

//! Sliding-window request limiter keyed by client address

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request from `client` and report whether it is allowed.
    pub async fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now()).await
    }

    /// Rejected requests do not count against the window. Clients with no
    /// hits left inside the window are forgotten.
    pub async fn check_at(&self, client: &str, now: Instant) -> bool {
        let mut hits = self.hits.lock().await;
        hits.retain(|_, recent| {
            recent
                .back()
                .is_some_and(|&last| now.saturating_duration_since(last) < self.window)
        });

        let recent = hits.entry(client.to_string()).or_default();
        while let Some(&oldest) = recent.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                recent.pop_front();
            } else {
                break;
            }
        }

        let allowed = recent.len() < self.max_requests;
        if allowed {
            recent.push_back(now);
        }
        if recent.is_empty() {
            hits.remove(client);
        }
        allowed
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.hits.lock().await.len()
    }
}

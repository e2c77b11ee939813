//! HTTP implementation of [`WikiApi`] over reqwest.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::{QueryParams, WikiApi, WikiError, WikiResult};
use crate::config::WikiConfig;

/// Talks to `api.php`. One instance is shared by every tool for the life of
/// the process; each call is bounded by the configured timeout and never
/// retried here.
pub struct WikiClient {
    api_url: String,
    http: reqwest::Client,
}

impl WikiClient {
    pub fn new(config: &WikiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            api_url: config.api_url.clone(),
            http,
        })
    }
}

#[async_trait]
impl WikiApi for WikiClient {
    async fn fetch(&self, params: &QueryParams<'_>) -> WikiResult<Value> {
        debug!(?params, "wiki request");

        let response = match self.http.get(&self.api_url).query(params).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                warn!("Wiki API timeout for params: {:?}", params);
                return Err(WikiError::Timeout);
            }
            Err(e) => {
                error!("Wiki API request failed: {}", e);
                return Err(WikiError::Request(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!("Wiki API HTTP error: {}", status);
            return Err(WikiError::Http(status.as_u16()));
        }

        let data: Value = match response.json().await {
            Ok(v) => v,
            Err(e) if e.is_timeout() => {
                warn!("Wiki API timeout reading body for params: {:?}", params);
                return Err(WikiError::Timeout);
            }
            Err(e) => {
                error!("Wiki API returned an undecodable body: {}", e);
                return Err(WikiError::Request(e.to_string()));
            }
        };

        // MediaWiki reports its own failures with a 200 and an `error` object.
        if let Some(err) = data.get("error") {
            let info = err
                .get("info")
                .and_then(Value::as_str)
                .unwrap_or("Wiki API returned an error. Please try again.")
                .to_string();
            warn!("Wiki API error: {}", info);
            return Err(WikiError::Api(info));
        }

        Ok(data)
    }
}

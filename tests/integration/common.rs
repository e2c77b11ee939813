use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use eve_wiki_mcp::wiki::{build_wiki_url, QueryParams, WikiApi, WikiError, WikiResult};
use serde_json::{json, Value};

pub const SEARCH_TITLES: [&str; 6] = [
    "Mining",
    "Venture",
    "Career Agents",
    "Highsec",
    "Ore",
    "Mining Frigate",
];

const SEARCH_DESCRIPTIONS: [&str; 6] = [
    "Mining overview and basics",
    "Starter mining frigate",
    "New player onboarding agents",
    "High-sec safety basics",
    "Ore types and mechanics",
    "Frigate fitting basics for miners",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    None,
    /// Searches whose phrase mentions highsec time out
    HighsecTimeout,
    /// Every call times out
    Everything,
}

/// A wiki that answers every action with small, predictable payloads.
pub struct FakeWiki {
    mode: FailureMode,
    calls: AtomicUsize,
}

impl FakeWiki {
    pub fn new() -> Self {
        Self::with_mode(FailureMode::None)
    }

    pub fn with_mode(mode: FailureMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn param<'a>(params: &'a QueryParams<'_>, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}

#[async_trait]
impl WikiApi for FakeWiki {
    async fn fetch(&self, params: &QueryParams<'_>) -> WikiResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.mode == FailureMode::Everything {
            return Err(WikiError::Timeout);
        }

        match (param(params, "action"), param(params, "prop")) {
            (Some("opensearch"), _) => {
                let query = param(params, "search").unwrap_or_default();
                if self.mode == FailureMode::HighsecTimeout
                    && query.to_lowercase().contains("highsec")
                {
                    return Err(WikiError::Timeout);
                }
                let urls: Vec<String> = SEARCH_TITLES.iter().map(|t| build_wiki_url(t)).collect();
                Ok(json!([query, SEARCH_TITLES, SEARCH_DESCRIPTIONS, urls]))
            }
            (Some("query"), Some("extracts")) => {
                let title = param(params, "titles").unwrap_or("Mining");
                Ok(json!({
                    "query": {"pages": {"1": {
                        "pageid": 1,
                        "title": title,
                        "extract": format!("{} summary for beginner mining pilots.", title)
                    }}}
                }))
            }
            (Some("parse"), _) => {
                let title = param(params, "page").unwrap_or("Mining");
                Ok(json!({
                    "parse": {
                        "text": {"*": "<p>Detailed mining page content including fitting and safety notes.</p>"},
                        "displaytitle": title,
                        "categories": []
                    }
                }))
            }
            _ => Ok(json!({})),
        }
    }
}

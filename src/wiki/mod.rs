//! MediaWiki access for the EVE University wiki.
//!
//! Everything above this module talks to the wiki through [`WikiApi`], so the
//! tools and the planning pipeline can be exercised against canned payloads
//! without a network.

pub mod client;
pub mod html;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use client::WikiClient;

/// Public page root used when building citation links.
pub const DEFAULT_PAGE_BASE_URL: &str = "https://wiki.eveuniversity.org/wiki";

/// Normalized failure of a single wiki call.
///
/// Every call yields either a payload or one of these, never both.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WikiError {
    #[error("wiki request timed out")]
    Timeout,
    #[error("wiki returned HTTP {0}")]
    Http(u16),
    #[error("wiki request failed: {0}")]
    Request(String),
    #[error("wiki API error: {0}")]
    Api(String),
    #[error("unexpected wiki response: {0}")]
    Parse(String),
}

impl WikiError {
    /// Message suitable for showing to the person who called a tool.
    pub fn info(&self) -> String {
        match self {
            WikiError::Timeout => "Request timed out. Wiki may be slow.".to_string(),
            WikiError::Http(_) => "Wiki API returned an error. Please try again.".to_string(),
            WikiError::Request(_) => "Request failed. Please try again later.".to_string(),
            WikiError::Api(info) => info.clone(),
            WikiError::Parse(reason) => reason.clone(),
        }
    }
}

pub type WikiResult<T> = std::result::Result<T, WikiError>;

/// One opensearch hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub description: String,
    /// Empty when the wiki did not supply a link for this hit.
    pub url: String,
}

/// Intro extract lookup outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extract {
    Found {
        title: String,
        /// `None` when the page exists but the wiki returned no extract field.
        extract: Option<String>,
    },
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    pub display_title: String,
    pub categories: Vec<String>,
}

/// Query parameters for one MediaWiki API call.
pub type QueryParams<'a> = [(&'a str, String)];

#[async_trait]
pub trait WikiApi: Send + Sync {
    /// Issue one API call and return the decoded JSON body.
    async fn fetch(&self, params: &QueryParams<'_>) -> WikiResult<Value>;

    /// Opensearch over the main namespace.
    async fn search(&self, query: &str, limit: usize) -> WikiResult<Vec<SearchHit>> {
        let params = [
            ("action", "opensearch".to_string()),
            ("search", query.to_string()),
            ("limit", limit.to_string()),
            ("format", "json".to_string()),
            ("namespace", "0".to_string()),
        ];
        let data = self.fetch(&params).await?;
        parse_opensearch(&data)
    }

    /// Plain-text introductory extract of a page.
    async fn get_extract(&self, title: &str) -> WikiResult<Extract> {
        let params = [
            ("action", "query".to_string()),
            ("prop", "extracts".to_string()),
            ("exintro", "true".to_string()),
            ("explaintext", "true".to_string()),
            ("titles", title.to_string()),
            ("format", "json".to_string()),
        ];
        let data = self.fetch(&params).await?;
        parse_extract(&data, title)
    }

    /// Fully rendered page HTML with display title and categories.
    async fn get_rendered_page(&self, title: &str) -> WikiResult<RenderedPage> {
        let params = [
            ("action", "parse".to_string()),
            ("page", title.to_string()),
            ("prop", "text|displaytitle|categories".to_string()),
            ("format", "json".to_string()),
            ("disabletoc", "true".to_string()),
        ];
        let data = self.fetch(&params).await?;
        parse_rendered_page(&data, title)
    }

    async fn category_members(&self, category: &str, limit: usize) -> WikiResult<Vec<String>> {
        let params = [
            ("action", "query".to_string()),
            ("list", "categorymembers".to_string()),
            ("cmtitle", format!("Category:{}", category)),
            ("cmlimit", limit.to_string()),
            ("format", "json".to_string()),
            ("cmnamespace", "0".to_string()),
        ];
        let data = self.fetch(&params).await?;
        parse_title_list(&data, "categorymembers")
    }

    /// Pages in the main namespace linking to `title`.
    async fn backlinks(&self, title: &str, limit: usize) -> WikiResult<Vec<String>> {
        let params = [
            ("action", "query".to_string()),
            ("list", "backlinks".to_string()),
            ("bltitle", title.to_string()),
            ("bllimit", limit.to_string()),
            ("blnamespace", "0".to_string()),
            ("format", "json".to_string()),
        ];
        let data = self.fetch(&params).await?;
        parse_title_list(&data, "backlinks")
    }
}

/// Build a wiki link for `title` under [`DEFAULT_PAGE_BASE_URL`].
pub fn build_wiki_url(title: &str) -> String {
    let slug = title.replace(' ', "_");
    format!("{}/{}", DEFAULT_PAGE_BASE_URL, urlencoding::encode(&slug))
}

/// Opensearch answers `[query, [titles], [descriptions], [urls]]`.
fn parse_opensearch(data: &Value) -> WikiResult<Vec<SearchHit>> {
    let parts = data
        .as_array()
        .ok_or_else(|| WikiError::Parse("search response is not an array".to_string()))?;

    let column = |idx: usize| -> Vec<String> {
        parts
            .get(idx)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|v| v.as_str().unwrap_or_default().to_string())
                    .collect()
            })
            .unwrap_or_default()
    };

    let titles = column(1);
    let descriptions = column(2);
    let urls = column(3);

    Ok(titles
        .into_iter()
        .enumerate()
        .map(|(idx, title)| SearchHit {
            title,
            description: descriptions.get(idx).cloned().unwrap_or_default(),
            url: urls.get(idx).cloned().unwrap_or_default(),
        })
        .collect())
}

/// A reply without a `pages` object is treated like a missing page rather
/// than a failure.
fn parse_extract(data: &Value, requested: &str) -> WikiResult<Extract> {
    let Some(page) = data
        .get("query")
        .and_then(|q| q.get("pages"))
        .and_then(Value::as_object)
        .and_then(|pages| pages.values().next())
    else {
        return Ok(Extract::Missing);
    };
    if page.get("missing").is_some() {
        return Ok(Extract::Missing);
    }

    Ok(Extract::Found {
        title: page
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(requested)
            .to_string(),
        extract: page
            .get("extract")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn parse_rendered_page(data: &Value, requested: &str) -> WikiResult<RenderedPage> {
    let parse = data
        .get("parse")
        .ok_or_else(|| WikiError::Parse(format!("no parse payload for '{}'", requested)))?;

    let html = parse
        .get("text")
        .and_then(|t| t.get("*"))
        .and_then(Value::as_str)
        .ok_or_else(|| WikiError::Parse(format!("no page text for '{}'", requested)))?
        .to_string();

    let display_title = parse
        .get("displaytitle")
        .and_then(Value::as_str)
        .unwrap_or(requested)
        .to_string();

    let categories = parse
        .get("categories")
        .and_then(Value::as_array)
        .map(|cats| {
            cats.iter()
                .filter_map(|c| c.get("*").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(RenderedPage {
        html,
        display_title,
        categories,
    })
}

fn parse_title_list(data: &Value, list: &str) -> WikiResult<Vec<String>> {
    let entries = data
        .get("query")
        .and_then(|q| q.get(list))
        .and_then(Value::as_array)
        .ok_or_else(|| WikiError::Parse(format!("response has no {} list", list)))?;

    Ok(entries
        .iter()
        .filter_map(|e| e.get("title").and_then(Value::as_str))
        .map(str::to_string)
        .collect())
}

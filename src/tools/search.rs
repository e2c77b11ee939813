use anyhow::Result;
use async_trait::async_trait;

use super::{error_text, Tool, ToolContext};
use crate::validation::{clamp_limit, validate_string_input, MAX_QUERY_LENGTH};

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 50;

pub struct SearchTool;

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search_eve_wiki"
    }

    fn description(&self) -> &str {
        "Search the EVE University Wiki for articles about ships, mechanics, guides, etc."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search term (e.g., 'Drake', 'exploration guide', 'wormhole mechanics')"
                },
                "limit": {
                    "type": "integer",
                    "description": "Number of results to return (1-50, default: 10)",
                    "default": DEFAULT_LIMIT,
                    "minimum": 1,
                    "maximum": MAX_LIMIT
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: serde_json::Value, ctx: &ToolContext<'_>) -> Result<String> {
        let query = match validate_string_input(params.get("query"), MAX_QUERY_LENGTH, "query") {
            Ok(q) => q,
            Err(e) => return Ok(error_text(e)),
        };
        let limit = clamp_limit(params.get("limit"), DEFAULT_LIMIT, MAX_LIMIT);

        let hits = match ctx.wiki.search(query, limit).await {
            Ok(hits) => hits,
            Err(e) => return Ok(error_text(format!("Error: {}", e.info()))),
        };

        if hits.is_empty() {
            return Ok(format!(
                "No results found for '{}'. Try different search terms or check spelling.",
                query
            ));
        }

        let results: Vec<String> = hits
            .iter()
            .map(|hit| format!("**{}**\n{}\n🔗 {}\n", hit.title, hit.description, hit.url))
            .collect();

        Ok(format!(
            "# Search Results for '{}'\n\nFound {} results:\n\n{}",
            query,
            hits.len(),
            results.join("\n")
        ))
    }
}

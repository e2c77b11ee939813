use anyhow::Result;
use async_trait::async_trait;
use tracing::error;

use super::{error_text, Tool, ToolContext};
use crate::validation::{clamp_limit, validate_string_input, MAX_TITLE_LENGTH};
use crate::wiki::WikiError;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 500;

/// Backlink lookup: which pages point at this one.
pub struct RelatedPagesTool;

#[async_trait]
impl Tool for RelatedPagesTool {
    fn name(&self) -> &str {
        "get_related_pages"
    }

    fn description(&self) -> &str {
        "Find pages that link to a specific wiki page"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Page title to find related pages for"
                },
                "limit": {
                    "type": "integer",
                    "description": "Number of results (1-500, default: 20)",
                    "default": DEFAULT_LIMIT,
                    "minimum": 1,
                    "maximum": MAX_LIMIT
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, params: serde_json::Value, ctx: &ToolContext<'_>) -> Result<String> {
        let title = match validate_string_input(params.get("title"), MAX_TITLE_LENGTH, "title") {
            Ok(t) => t,
            Err(e) => return Ok(error_text(e)),
        };
        let limit = clamp_limit(params.get("limit"), DEFAULT_LIMIT, MAX_LIMIT);

        let backlinks = match ctx.wiki.backlinks(title, limit).await {
            Ok(links) => links,
            Err(WikiError::Parse(reason)) => {
                error!("Error finding related pages for {}: {}", title, reason);
                return Ok(error_text("Error finding related pages. Please try again."));
            }
            Err(e) => return Ok(error_text(format!("Error: {}", e.info()))),
        };

        if backlinks.is_empty() {
            return Ok(format!("No pages link to '{}'.", title));
        }

        let listing: Vec<String> = backlinks.iter().map(|t| format!("- {}", t)).collect();
        Ok(format!(
            "# Pages linking to '{}'\n\nFound {} pages:\n\n{}",
            title,
            backlinks.len(),
            listing.join("\n")
        ))
    }
}

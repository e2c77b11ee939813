use anyhow::Result;
use async_trait::async_trait;
use tracing::error;

use super::{error_text, Tool, ToolContext};
use crate::validation::{validate_string_input, MAX_TITLE_LENGTH};
use crate::wiki::{build_wiki_url, Extract, WikiError};

pub struct SummaryTool;

#[async_trait]
impl Tool for SummaryTool {
    fn name(&self) -> &str {
        "get_eve_wiki_summary"
    }

    fn description(&self) -> &str {
        "Get a brief summary/introduction of a wiki page without full content"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Page title to get summary for"
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

        match ctx.wiki.get_extract(title).await {
            Ok(Extract::Found {
                title: page_title,
                extract,
            }) => Ok(format!(
                "# {}\n\n🔗 {}\n\n{}",
                page_title,
                build_wiki_url(title),
                extract.as_deref().unwrap_or("No summary available.")
            )),
            Ok(Extract::Missing) => Ok(error_text(format!("Page '{}' does not exist.", title))),
            Err(WikiError::Parse(reason)) => {
                error!("Error getting summary for {}: {}", title, reason);
                Ok(error_text("Error getting summary. Please try again."))
            }
            Err(e) => Ok(error_text(format!("Error: {}", e.info()))),
        }
    }
}

use anyhow::Result;
use async_trait::async_trait;
use tracing::error;

use super::{error_text, Tool, ToolContext};
use crate::validation::{validate_string_input, MAX_TITLE_LENGTH};
use crate::wiki::html::html_to_markdown;
use crate::wiki::{build_wiki_url, WikiError};

/// Categories shown in the page header.
const MAX_CATEGORIES: usize = 5;

pub struct PageTool;

#[async_trait]
impl Tool for PageTool {
    fn name(&self) -> &str {
        "get_eve_wiki_page"
    }

    fn description(&self) -> &str {
        "Get the full content of a specific EVE University Wiki page in markdown format"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Exact page title (e.g., 'Drake', 'Mining', 'Wormholes')"
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

        let page = match ctx.wiki.get_rendered_page(title).await {
            Ok(page) => page,
            Err(WikiError::Parse(reason)) => {
                error!("Missing expected key in wiki response: {}", reason);
                return Ok(error_text(
                    "Error parsing page content. The page format may be unexpected.",
                ));
            }
            Err(e) => {
                return Ok(error_text(format!(
                    "Error: {}\n\nThe page '{}' might not exist. Try searching first.",
                    e.info(),
                    title
                )))
            }
        };

        let markdown = html_to_markdown(&page.html).replace("[ edit ]", "");

        let mut result = format!("# {}\n\n", page.display_title);
        result.push_str(&format!("🔗 {}\n\n", build_wiki_url(title)));
        if !page.categories.is_empty() {
            let shown: Vec<&str> = page
                .categories
                .iter()
                .take(MAX_CATEGORIES)
                .map(String::as_str)
                .collect();
            result.push_str(&format!("**Categories:** {}\n\n", shown.join(", ")));
        }
        result.push_str("---\n\n");
        result.push_str(&markdown);

        Ok(result)
    }
}

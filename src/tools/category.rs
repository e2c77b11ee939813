use anyhow::Result;
use async_trait::async_trait;
use tracing::error;

use super::{error_text, Tool, ToolContext};
use crate::validation::{clamp_limit, validate_string_input, MAX_CATEGORY_LENGTH};
use crate::wiki::WikiError;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

pub struct BrowseCategoryTool;

#[async_trait]
impl Tool for BrowseCategoryTool {
    fn name(&self) -> &str {
        "browse_eve_wiki_category"
    }

    fn description(&self) -> &str {
        "Browse pages in a specific category (e.g., Ships, Modules, Skills, Guides)"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Category name (e.g., 'Ships', 'Mining', 'PvP', 'Exploration')"
                },
                "limit": {
                    "type": "integer",
                    "description": "Number of pages to return (1-500, default: 50)",
                    "default": DEFAULT_LIMIT,
                    "minimum": 1,
                    "maximum": MAX_LIMIT
                }
            },
            "required": ["category"]
        })
    }

    async fn execute(&self, params: serde_json::Value, ctx: &ToolContext<'_>) -> Result<String> {
        let category =
            match validate_string_input(params.get("category"), MAX_CATEGORY_LENGTH, "category") {
                Ok(c) => c,
                Err(e) => return Ok(error_text(e)),
            };
        let limit = clamp_limit(params.get("limit"), DEFAULT_LIMIT, MAX_LIMIT);

        let members = match ctx.wiki.category_members(category, limit).await {
            Ok(members) => members,
            Err(WikiError::Parse(reason)) => {
                error!("Error browsing category {}: {}", category, reason);
                return Ok(error_text("Error browsing category. Please try again."));
            }
            Err(e) => return Ok(error_text(format!("Error: {}", e.info()))),
        };

        if members.is_empty() {
            return Ok(format!(
                "No pages found in Category:{}. The category might not exist or be empty.",
                category
            ));
        }

        let listing: Vec<String> = members.iter().map(|title| format!("- {}", title)).collect();
        Ok(format!(
            "# Category: {}\n\nFound {} pages:\n\n{}",
            category,
            members.len(),
            listing.join("\n")
        ))
    }
}

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::wiki::WikiApi;

pub mod category;
pub mod mining_plan;
pub mod page;
pub mod related;
pub mod search;
pub mod summary;

pub use category::BrowseCategoryTool;
pub use mining_plan::MiningPlanTool;
pub use page::PageTool;
pub use related::RelatedPagesTool;
pub use search::SearchTool;
pub use summary::SummaryTool;

/// Prefix on every user-facing failure message.
pub const ERROR_PREFIX: &str = "❌";

/// Format a user-facing failure.
pub fn error_text(message: impl std::fmt::Display) -> String {
    format!("{} {}", ERROR_PREFIX, message)
}

/// Context passed to tool execution
#[derive(Clone, Copy)]
pub struct ToolContext<'a> {
    pub wiki: &'a dyn WikiApi,
}

impl<'a> ToolContext<'a> {
    pub fn new(wiki: &'a dyn WikiApi) -> Self {
        Self { wiki }
    }
}

/// A callable tool. Bad input and upstream failures come back as `Ok` text
/// for the caller to read; `Err` is reserved for bugs.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> serde_json::Value;
    async fn execute(&self, params: serde_json::Value, ctx: &ToolContext<'_>) -> Result<String>;
}

pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        let mut registry = Self { tools: vec![] };
        // Single-query lookups
        registry.register(Box::new(SearchTool));
        registry.register(Box::new(PageTool));
        registry.register(Box::new(SummaryTool));
        registry.register(Box::new(BrowseCategoryTool));
        registry.register(Box::new(RelatedPagesTool));
        // Planning
        registry.register(Box::new(MiningPlanTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn get_tool(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn tools(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(|t| t.as_ref())
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn get_tools_schema(&self) -> Vec<serde_json::Value> {
        self.tools
            .iter()
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "input_schema": tool.parameters_schema()
                })
            })
            .collect()
    }

    /// Dispatch by name. Unknown names get a readable reply rather than an
    /// error.
    pub async fn execute(
        &self,
        name: &str,
        params: serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> Result<String> {
        match self.get_tool(name) {
            Some(tool) => {
                debug!("Executing tool '{}'", name);
                tool.execute(params, ctx).await
            }
            None => {
                warn!("Unknown tool requested: {}", name);
                Ok(error_text(format!("Unknown tool: {}", name)))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

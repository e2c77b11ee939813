//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};

pub const SERVICE_NAME: &str = "eve-university-wiki-mcp";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// One advertised tool
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolInfo>,
}

/// Result of a tool call. `is_error` mirrors the text's failure prefix.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolCallResponse {
    pub request_id: String,
    pub tool: String,
    pub content: String,
    pub is_error: bool,
}

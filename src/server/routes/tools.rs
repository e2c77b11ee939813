//! Tool listing and invocation endpoints

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::server::state::AppState;
use crate::server::types::{ErrorResponse, ToolCallResponse, ToolInfo, ToolListResponse};
use crate::tools::{ToolContext, ERROR_PREFIX};

/// GET /api/tools
pub async fn list_tools(State(state): State<Arc<AppState>>) -> Json<ToolListResponse> {
    let tools = state
        .registry
        .tools()
        .map(|tool| ToolInfo {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.parameters_schema(),
        })
        .collect();
    Json(ToolListResponse { tools })
}

/// POST /api/tools/:name
///
/// The body is the tool's argument object; an empty body means no
/// arguments and anything else must be valid JSON.
pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<ToolCallResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = uuid::Uuid::new_v4().to_string();

    let Some(tool) = state.registry.get_tool(&name) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Unknown tool: {}", name))),
        ));
    };

    let params = parse_arguments(&body).map_err(|e| {
        warn!(%request_id, "Rejected malformed body for {}: {}", name, e);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Invalid JSON body: {}", e))),
        )
    })?;
    info!(%request_id, tool = %name, "Tool call");

    let ctx = ToolContext::new(state.wiki.as_ref());
    match tool.execute(params, &ctx).await {
        Ok(text) => Ok(Json(ToolCallResponse {
            is_error: text.starts_with(ERROR_PREFIX),
            request_id,
            tool: name,
            content: text,
        })),
        Err(e) => {
            error!(%request_id, "Tool {} failed: {}", name, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            ))
        }
    }
}

fn parse_arguments(body: &[u8]) -> serde_json::Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}

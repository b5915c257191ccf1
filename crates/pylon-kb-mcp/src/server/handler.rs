//! MCP method dispatch shared by the stdio and HTTP transports.

use serde_json::json;

use super::transport::{JsonRpcRequest, JsonRpcResponse, McpToolInfo, error_codes};
use crate::resources;
use crate::tools::{McpTool, ToolContext};

/// Protocol version announced when the client does not ask for one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported in `initialize`.
pub const SERVER_NAME: &str = "pylon-kb-mcp";

/// Handle one JSON-RPC message. Notifications yield `None`.
pub async fn handle_request(
    req: &JsonRpcRequest,
    tools: &[Box<dyn McpTool>],
    ctx: &ToolContext,
) -> Option<JsonRpcResponse> {
    let id = req.id.clone();

    let response = match req.method.as_str() {
        "initialize" => JsonRpcResponse::success(id, handle_initialize(&req.params)),
        "notifications/initialized" | "initialized" | "notifications/cancelled" => {
            if req.is_notification() {
                return None;
            }
            JsonRpcResponse::success(id, json!({}))
        }
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => handle_tools_list(id, tools),
        "tools/call" => handle_tools_call(id, &req.params, tools, ctx).await,
        "resources/list" => handle_resources_list(id),
        "resources/read" => handle_resources_read(id, &req.params, ctx).await,
        _ => {
            if req.is_notification() {
                return None;
            }
            JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", req.method),
            )
        }
    };

    Some(response)
}

fn handle_initialize(params: &serde_json::Value) -> serde_json::Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    tracing::info!("MCP initialize: protocol version {}", protocol_version);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": {
                "listChanged": false
            },
            "resources": {}
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn handle_tools_list(id: Option<serde_json::Value>, tools: &[Box<dyn McpTool>]) -> JsonRpcResponse {
    let tool_list: Vec<McpToolInfo> = tools
        .iter()
        .map(|t| McpToolInfo {
            name: t.name().to_string(),
            description: t.description().to_string(),
            input_schema: t.input_schema(),
        })
        .collect();

    JsonRpcResponse::success(id, json!({ "tools": tool_list }))
}

async fn handle_tools_call(
    id: Option<serde_json::Value>,
    params: &serde_json::Value,
    tools: &[Box<dyn McpTool>],
    ctx: &ToolContext,
) -> JsonRpcResponse {
    let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
        return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing 'name' parameter");
    };

    let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    let Some(tool) = tools.iter().find(|t| t.name() == tool_name) else {
        return JsonRpcResponse::error(
            id,
            error_codes::INVALID_PARAMS,
            format!("Tool not found: {tool_name}"),
        );
    };

    tracing::info!(tool = %tool_name, "Executing tool");

    match tool.execute(ctx, arguments).await {
        Ok(text) => JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": text
                }]
            }),
        ),
        Err(e) => {
            tracing::error!(tool = %tool_name, error = %e, "Tool execution failed");
            JsonRpcResponse::success(
                id,
                json!({
                    "content": [{
                        "type": "text",
                        "text": format!("Error {}: {}", tool.action(), e.to_user_message())
                    }],
                    "isError": true
                }),
            )
        }
    }
}

fn handle_resources_list(id: Option<serde_json::Value>) -> JsonRpcResponse {
    JsonRpcResponse::success(id, json!({ "resources": resources::list_resources() }))
}

async fn handle_resources_read(
    id: Option<serde_json::Value>,
    params: &serde_json::Value,
    ctx: &ToolContext,
) -> JsonRpcResponse {
    let Some(uri) = params.get("uri").and_then(|v| v.as_str()) else {
        return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing 'uri' parameter");
    };

    match resources::read_resource(&ctx.kb, uri).await {
        Ok(contents) => JsonRpcResponse::success(id, json!({ "contents": [contents] })),
        Err(e) => {
            tracing::warn!(uri, error = %e, "Resource read failed");
            JsonRpcResponse::error(id, e.code(), e.to_string())
        }
    }
}

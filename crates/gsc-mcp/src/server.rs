//! Line-delimited JSON-RPC loop.

use gsc_core::google::SearchConsole;
use gsc_core::ErrorCode;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::initialize;
use crate::protocol::{error, success, InitializeRequest, JsonRpcRequest, JsonRpcResponse, ToolsCallRequest};
use crate::tools::{ToolCallError, ToolRegistry};

/// Read one request per line until EOF, writing one response per line.
pub async fn serve<R, W, S>(reader: R, mut writer: W, registry: &ToolRegistry<S>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: SearchConsole,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(response) = handle_line(registry, trimmed).await {
            writer.write_all(serde_json::to_string(&response)?.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    debug!("Input closed, shutting down");
    Ok(())
}

/// Handle a single line. Notifications produce no response.
pub async fn handle_line<S: SearchConsole>(registry: &ToolRegistry<S>, line: &str) -> Option<JsonRpcResponse> {
    let request = match serde_json::from_str::<JsonRpcRequest>(line) {
        Ok(req) => req,
        Err(e) => {
            warn!("Unparseable request: {}", e);
            return Some(error(Value::Null, ErrorCode::ParseError, format!("parse error: {}", e), None));
        }
    };

    let Some(id) = request.id else {
        debug!("Notification {}", request.method);
        return None;
    };

    let response = match request.method.as_str() {
        "initialize" => match serde_json::from_value::<InitializeRequest>(request.params) {
            Ok(init) => to_result(id, &initialize::handle_initialize(init)),
            Err(e) => error(id, ErrorCode::InvalidParams, format!("invalid initialize params: {}", e), None),
        },
        "ping" => success(id, json!({})),
        "tools/list" => to_result(id, &registry.list_response()),
        "tools/call" => match serde_json::from_value::<ToolsCallRequest>(request.params) {
            Ok(call) => match registry.call_tool(&call.name, call.arguments).await {
                Ok(result) => to_result(id, &result),
                Err(ToolCallError::UnknownTool(name)) => {
                    error(id, ErrorCode::MethodNotFound, format!("unknown tool: {}", name), None)
                }
                Err(ToolCallError::InvalidParams(e)) => error(
                    id,
                    ErrorCode::InvalidParams,
                    format!("invalid arguments for {}: {}", call.name, e),
                    Some(json!({"field": e.field, "reason": e.reason})),
                ),
            },
            Err(e) => error(id, ErrorCode::InvalidParams, format!("invalid tools/call params: {}", e), None),
        },
        _ => error(id, ErrorCode::MethodNotFound, format!("method not found: {}", request.method), None),
    };

    Some(response)
}

fn to_result<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => success(id, value),
        Err(e) => error(id, ErrorCode::InternalError, e.to_string(), None),
    }
}

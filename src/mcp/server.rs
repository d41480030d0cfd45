use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::mcp::{
    InitializeParams, JsonRpcRequest, JsonRpcResponse, McpError, Resource, ResourceReadParams,
    Tool, ToolCallParams,
};

#[async_trait]
pub trait McpHandler: Send + Sync {
    async fn initialize(&self, params: InitializeParams) -> Result<serde_json::Value, McpError>;
    async fn list_tools(&self) -> Result<Vec<Tool>, McpError>;
    async fn call_tool(&self, params: ToolCallParams) -> Result<serde_json::Value, McpError>;
    async fn list_resources(&self) -> Result<Vec<Resource>, McpError>;
    async fn read_resource(&self, params: ResourceReadParams)
        -> Result<serde_json::Value, McpError>;
}

/// Line-delimited JSON-RPC server over TCP or stdio
pub struct McpServer {
    handler: Arc<dyn McpHandler>,
}

impl McpServer {
    pub fn new(handler: Arc<dyn McpHandler>) -> Self {
        Self { handler }
    }

    pub async fn run(&self, addr: &str) -> Result<(), McpError> {
        let listener = TcpListener::bind(addr).await?;
        info!("MCP Server listening on {}", addr);

        loop {
            let (stream, peer) = listener.accept().await?;
            let handler = Arc::clone(&self.handler);
            debug!(%peer, "Accepted connection");

            tokio::spawn(async move {
                if let Err(e) = Self::handle_connection(stream, handler).await {
                    error!("Error handling connection from {}: {}", peer, e);
                }
            });
        }
    }

    async fn handle_connection(
        mut stream: TcpStream,
        handler: Arc<dyn McpHandler>,
    ) -> Result<(), McpError> {
        let (reader, writer) = stream.split();
        serve_lines(handler.as_ref(), BufReader::new(reader), writer).await
    }

    pub async fn run_stdio(&self) -> Result<(), McpError> {
        info!("MCP Server running on stdio");
        serve_lines(
            self.handler.as_ref(),
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
        .await
    }

    /// Handle one raw request line. Notifications produce no response.
    pub async fn process_line(&self, line: &str) -> Option<JsonRpcResponse> {
        process_request(self.handler.as_ref(), line).await
    }
}

/// Read requests line by line until EOF, writing one response line per request
pub async fn serve_lines<R, W>(
    handler: &dyn McpHandler,
    mut reader: R,
    mut writer: W,
) -> Result<(), McpError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            break; // EOF
        }

        if line.trim().is_empty() {
            continue;
        }

        if let Some(response) = process_request(handler, &line).await {
            let response_str = serde_json::to_string(&response)?;
            writer.write_all(response_str.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    Ok(())
}

async fn process_request(handler: &dyn McpHandler, line: &str) -> Option<JsonRpcResponse> {
    let value: serde_json::Value = match serde_json::from_str(line.trim()) {
        Ok(value) => value,
        Err(e) => {
            warn!("Malformed JSON-RPC request: {}", e);
            return Some(JsonRpcResponse::failure(
                None,
                McpError::Parse(e.to_string()).into(),
            ));
        }
    };

    // Valid JSON but not a request object: answer with whatever id was sent
    let raw_id = value.get("id").cloned();
    let request: JsonRpcRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            warn!("Invalid JSON-RPC request: {}", e);
            return Some(JsonRpcResponse::failure(
                raw_id,
                McpError::InvalidRequest(e.to_string()).into(),
            ));
        }
    };

    if request.is_notification() {
        debug!(method = %request.method, "Notification received");
        return None;
    }

    debug!(method = %request.method, "Request received");
    let id = request.id.clone();

    let result = dispatch(handler, request).await;

    Some(match result {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(e) => {
            warn!("Request failed: {}", e);
            JsonRpcResponse::failure(id, e.into())
        }
    })
}

async fn dispatch(
    handler: &dyn McpHandler,
    request: JsonRpcRequest,
) -> Result<serde_json::Value, McpError> {
    if request.jsonrpc != "2.0" {
        return Err(McpError::InvalidRequest(format!(
            "unsupported jsonrpc version '{}'",
            request.jsonrpc
        )));
    }

    let params = request.params.unwrap_or_default();

    match request.method.as_str() {
        "initialize" => {
            let params: InitializeParams = if params.is_null() {
                InitializeParams::default()
            } else {
                serde_json::from_value(params)
                    .map_err(|e| McpError::InvalidParams(e.to_string()))?
            };
            handler.initialize(params).await
        }
        "ping" => Ok(serde_json::json!({})),
        "tools/list" => {
            let tools = handler.list_tools().await?;
            Ok(serde_json::json!({ "tools": tools }))
        }
        "tools/call" => {
            let params: ToolCallParams = serde_json::from_value(params)
                .map_err(|e| McpError::InvalidParams(e.to_string()))?;
            handler.call_tool(params).await
        }
        "resources/list" => {
            let resources = handler.list_resources().await?;
            Ok(serde_json::json!({ "resources": resources }))
        }
        "resources/read" => {
            let params: ResourceReadParams = serde_json::from_value(params)
                .map_err(|e| McpError::InvalidParams(e.to_string()))?;
            handler.read_resource(params).await
        }
        other => Err(McpError::MethodNotFound(other.to_string())),
    }
}

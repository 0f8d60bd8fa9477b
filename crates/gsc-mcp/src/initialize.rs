use tracing::info;

use crate::protocol::{
    InitializeRequest, InitializeResponse, MCP_PROTOCOL_VERSION, ServerCapabilities, ServerInfo,
    ToolsCapabilities,
};

pub const SERVER_NAME: &str = "google-search-console";

pub fn handle_initialize(request: InitializeRequest) -> InitializeResponse {
    info!(
        "Client {} {} connected (protocol {})",
        request.client_info.name, request.client_info.version, request.protocol_version
    );

    InitializeResponse {
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapabilities { list_changed: false },
        },
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        instructions: "Google Search Console tools. Call list_sites first to discover property identifiers \
            (URL-prefix like https://example.com/ or domain like sc-domain:example.com). Dates use YYYY-MM-DD. \
            delete_sitemap is destructive; confirm before calling it."
            .to_string(),
    }
}

//! Terminal output for the refresh-token flows.

use gsc_core::config::{ClientCredentials, CLIENT_ID_VAR, CLIENT_SECRET_VAR, REFRESH_TOKEN_VAR};
use serde_json::{json, Value};

/// Name the server is registered under in MCP client configuration.
const SERVER_NAME: &str = "google-search-console";
const SERVER_COMMAND: &str = "gsc-mcp";

pub fn print_consent_prompt(authorize_url: &str) {
    println!("\n=== Google Search Console OAuth Setup ===\n");
    println!("1. Open this URL in your browser:\n");
    println!("{}", authorize_url);
    println!("\n2. Sign in with your Google account and authorize the application");
}

/// `.mcp.json` entry launching the server with the obtained credentials.
pub fn mcp_config(credentials: &ClientCredentials, refresh_token: &str) -> Value {
    json!({
        "mcpServers": {
            SERVER_NAME: {
                "command": SERVER_COMMAND,
                "args": [],
                "env": {
                    CLIENT_ID_VAR: credentials.client_id,
                    CLIENT_SECRET_VAR: credentials.client_secret,
                    REFRESH_TOKEN_VAR: refresh_token,
                }
            }
        }
    })
}

pub fn render_success(credentials: &ClientCredentials, refresh_token: &str) -> String {
    let snippet = serde_json::to_string_pretty(&mcp_config(credentials, refresh_token))
        .unwrap_or_else(|_| "{}".to_string());

    format!(
        "\n=== Success! ===\n\n\
         Refresh token:\n{token}\n\n\
         Add these values to your environment:\n\n\
         {id_var}={id}\n\
         {secret_var}={secret}\n\
         {token_var}={token}\n\n\
         --- .mcp.json snippet ---\n\n\
         {snippet}\n",
        token = refresh_token,
        id_var = CLIENT_ID_VAR,
        id = credentials.client_id,
        secret_var = CLIENT_SECRET_VAR,
        secret = credentials.client_secret,
        token_var = REFRESH_TOKEN_VAR,
        snippet = snippet,
    )
}

//! Loopback flow: Google redirects the browser to a one-shot local listener.

use std::collections::HashMap;

use anyhow::Context;
use gsc_core::auth::{obtain_refresh_token, OAuthProvider, SEARCH_CONSOLE_SCOPES};
use gsc_core::GscError;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::output;

pub const DEFAULT_PORT: u16 = 8085;
pub const CALLBACK_PATH: &str = "/oauth/callback";

#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("callback did not include an authorization code")]
    MissingCode,

    #[error("authorization was denied: {0}")]
    Denied(String),

    #[error("token exchange failed: {0}")]
    Exchange(#[from] GscError),
}

impl CallbackError {
    fn status(&self) -> &'static str {
        match self {
            CallbackError::MissingCode | CallbackError::Denied(_) => "400 Bad Request",
            CallbackError::Exchange(_) => "500 Internal Server Error",
        }
    }
}

#[derive(Debug, Error)]
pub enum ListenError {
    #[error(transparent)]
    Callback(#[from] CallbackError),

    #[error("callback listener stopped accepting connections: {0}")]
    Accept(#[from] std::io::Error),
}

pub fn redirect_uri(port: u16) -> String {
    format!("http://localhost:{}{}", port, CALLBACK_PATH)
}

pub async fn run<P: OAuthProvider>(provider: &P, port: u16, open_browser: bool) -> anyhow::Result<String> {
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("Failed to bind callback listener on port {}", port))?;

    let redirect = redirect_uri(port);
    let url = provider.authorize_url(SEARCH_CONSOLE_SCOPES, &redirect);
    output::print_consent_prompt(&url);
    println!("3. Waiting for the redirect on {}\n", redirect);

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!("Failed to open browser automatically: {}", e);
        }
    }

    Ok(serve_callback(listener, provider, &redirect).await?)
}

/// Accept connections until one hits the callback path, answer it and
/// return the outcome. Other requests, and connections that fail before a
/// request line is read, are dropped unanswered.
pub async fn serve_callback<P: OAuthProvider>(
    listener: TcpListener,
    provider: &P,
    redirect_uri: &str,
) -> Result<String, ListenError> {
    info!("OAuth callback listener on {}", redirect_uri);

    loop {
        let (mut socket, peer) = listener.accept().await?;

        let target = match read_request_target(&mut socket).await {
            Ok(Some(target)) => target,
            Ok(None) => {
                debug!("Dropping non-GET request from {}", peer);
                continue;
            }
            Err(e) => {
                debug!("Dropping connection from {}: {}", peer, e);
                continue;
            }
        };
        let Some(params) = callback_params(&target) else {
            debug!("Ignoring request for {} from {}", target, peer);
            continue;
        };

        let outcome = complete(provider, &params, redirect_uri).await;
        let (status, page) = match &outcome {
            Ok(_) => (
                "200 OK",
                html_page("Authorization complete. Your refresh token is shown in the terminal; you can close this tab."),
            ),
            Err(e) => (e.status(), html_page(&format!("Error: {}", e))),
        };
        // The code is spent; the token is returned even if the page cannot be written.
        if let Err(e) = send_response(&mut socket, status, page).await {
            warn!("Failed to answer the browser at {}: {}", peer, e);
        }

        return outcome.map_err(ListenError::from);
    }
}

async fn complete<P: OAuthProvider>(
    provider: &P,
    params: &HashMap<String, String>,
    redirect_uri: &str,
) -> Result<String, CallbackError> {
    if let Some(code) = params.get("code").filter(|c| !c.trim().is_empty()) {
        return Ok(obtain_refresh_token(provider, code, redirect_uri).await?);
    }

    if let Some(error) = params.get("error") {
        let description = params
            .get("error_description")
            .map(|s| s.as_str())
            .unwrap_or("Unknown error");
        return Err(CallbackError::Denied(format!("{} - {}", error, description)));
    }

    Err(CallbackError::MissingCode)
}

/// Read the request line and drain the headers. `None` for anything other
/// than a GET, including an empty or non-HTTP request.
async fn read_request_target(socket: &mut TcpStream) -> std::io::Result<Option<String>> {
    let mut reader = BufReader::new(socket);
    let mut raw = Vec::new();
    if reader.read_until(b'\n', &mut raw).await? == 0 {
        return Ok(None);
    }
    let request_line = String::from_utf8_lossy(&raw).into_owned();

    let mut header = Vec::new();
    loop {
        header.clear();
        let n = reader.read_until(b'\n', &mut header).await?;
        if n == 0 || header.iter().all(|b| b.is_ascii_whitespace()) {
            break;
        }
    }

    // "GET /path?query HTTP/1.1"
    let mut parts = request_line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("GET"), Some(target)) => Ok(Some(target.to_string())),
        _ => Ok(None),
    }
}

/// Query parameters of a request target on the callback path.
fn callback_params(target: &str) -> Option<HashMap<String, String>> {
    let url = url::Url::parse(&format!("http://localhost{}", target)).ok()?;
    if url.path() != CALLBACK_PATH {
        return None;
    }
    Some(url.query_pairs().into_owned().collect())
}

async fn send_response(socket: &mut TcpStream, status: &str, html: String) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        html.len(),
        html
    );
    socket.write_all(response.as_bytes()).await?;
    socket.flush().await?;
    Ok(())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn html_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Google Search Console - OAuth Authorization</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            display: flex;
            justify-content: center;
            align-items: center;
            height: 100vh;
            margin: 0;
            background: #f1f3f4;
        }}
        .container {{
            background: white;
            padding: 2rem;
            border-radius: 8px;
            box-shadow: 0 2px 12px rgba(0,0,0,0.15);
            text-align: center;
            max-width: 420px;
        }}
        h1 {{
            color: #202124;
            font-size: 1.4rem;
        }}
        p {{
            color: #5f6368;
            line-height: 1.6;
        }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Google Search Console</h1>
        <p>{}</p>
    </div>
</body>
</html>"#,
        escape_html(message)
    )
}

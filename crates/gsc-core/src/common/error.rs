//! Common Error Types
//!
//! Unified error handling with JSON-RPC error code mapping.

use thiserror::Error;

/// JSON-RPC error codes
///
/// Standard codes: -32768 to -32000
/// Custom codes: -32099 to -32000
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Standard JSON-RPC errors
    ParseError = -32700,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,

    // Credential and token errors
    MissingCredentials = -32010,
    TokenExchangeFailed = -32011,

    // Remote API errors
    TransportError = -32001,
    RemoteError = -32000,
}

impl ErrorCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// Every failure the Search Console bridge can surface.
#[derive(Debug, Error)]
pub enum GscError {
    /// Required environment variables are absent or blank.
    #[error(
        "Missing Google OAuth2 credentials. Please set {} environment variable(s).",
        .0.join(", ")
    )]
    MissingCredentials(Vec<&'static str>),

    /// Caller input rejected before any remote call.
    #[error("Invalid arguments: {0}")]
    InvalidParams(String),

    /// Non-success status returned by a Google API.
    #[error("Google API error {code}: {message}")]
    Api { code: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// A response body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The token endpoint rejected an authorization code or refresh token.
    #[error("{error}: {description}")]
    TokenExchange { error: String, description: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl GscError {
    /// JSON-RPC code reported alongside this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            GscError::MissingCredentials(_) => ErrorCode::MissingCredentials,
            GscError::InvalidParams(_) => ErrorCode::InvalidParams,
            GscError::Api { .. } => ErrorCode::RemoteError,
            GscError::Transport(_) => ErrorCode::TransportError,
            GscError::Decode(_) => ErrorCode::InternalError,
            GscError::TokenExchange { .. } => ErrorCode::TokenExchangeFailed,
            GscError::HttpClient(_) => ErrorCode::InternalError,
        }
    }
}

impl From<reqwest::Error> for GscError {
    fn from(err: reqwest::Error) -> Self {
        GscError::Transport(err.to_string())
    }
}

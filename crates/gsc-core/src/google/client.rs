//! Google API Authenticated HTTP Client
//!
//! Injects bearer tokens from the session into every request and maps Google
//! REST error envelopes onto [`GscError::Api`]. No retries, no rate limiting:
//! remote failures are returned to the caller as-is.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::auth::{OAuthProvider, Session};
use crate::common::{GscError, GscResult};

/// Google API HTTP client bound to an authenticated session
pub struct GoogleClient<P> {
    http: Client,
    session: Session<P>,
}

impl<P: OAuthProvider> GoogleClient<P> {
    pub fn new(http: Client, session: Session<P>) -> Self {
        Self { http, session }
    }

    /// Make an authenticated GET request
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> GscResult<T> {
        let builder = self.http.get(url);
        self.execute(builder).await
    }

    /// Make an authenticated POST request with JSON body
    pub async fn post<B, T>(&self, url: &str, body: &B) -> GscResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.post(url).json(body);
        self.execute(builder).await
    }

    /// Make an authenticated PUT request without a body
    pub async fn put_empty(&self, url: &str) -> GscResult<()> {
        let builder = self.http.put(url).header(reqwest::header::CONTENT_LENGTH, 0);
        self.execute::<Value>(builder).await.map(|_| ())
    }

    /// Make an authenticated DELETE request
    pub async fn delete(&self, url: &str) -> GscResult<()> {
        let builder = self.http.delete(url);
        self.execute::<Value>(builder).await.map(|_| ())
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> GscResult<T> {
        let token = self.session.access_token().await?;
        let parsed = self.execute_request(builder.bearer_auth(token)).await?;
        serde_json::from_value(parsed).map_err(|e| GscError::Decode(e.to_string()))
    }

    /// Execute a request and handle Google API response patterns
    async fn execute_request(&self, builder: RequestBuilder) -> GscResult<Value> {
        debug!("Executing Google API request");

        let response = builder.send().await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Quota exceeded for Search Console API");
        }

        let body = response.text().await?;

        // Empty successful responses (e.g., DELETE)
        if status.is_success() && body.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        if !status.is_success() {
            let err = extract_error(&body, status);
            error!("Google API error: {}", err);
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| GscError::Decode(format!("{} (body: {})", e, body)))
    }
}

/// Extract the error from a Google API error response
///
/// Google APIs return errors in this format:
/// `{"error": {"code": 400, "message": "Invalid request", "errors": [...]}}`
fn extract_error(body: &str, status: StatusCode) -> GscError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if let Some(error_obj) = parsed.as_ref().and_then(|v| v.get("error")) {
        if let Some(message) = error_obj.get("message").and_then(|v| v.as_str()) {
            let code = error_obj
                .get("code")
                .and_then(|v| v.as_u64())
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(status.as_u16());
            return GscError::Api {
                code,
                message: message.to_string(),
            };
        }
        // OAuth-style envelope: {"error": "invalid_grant", "error_description": "..."}
        if let Some(kind) = error_obj.as_str() {
            let description = parsed
                .as_ref()
                .and_then(|v| v.get("error_description"))
                .and_then(|v| v.as_str())
                .unwrap_or(kind);
            return GscError::Api {
                code: status.as_u16(),
                message: description.to_string(),
            };
        }
    }

    GscError::Api {
        code: status.as_u16(),
        message: format!("HTTP {} error", status),
    }
}

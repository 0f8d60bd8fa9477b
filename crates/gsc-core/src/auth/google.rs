//! Google OAuth2 Provider
//!
//! Authorization Code flow with offline access against Google's OAuth 2.0
//! endpoints. `prompt=consent` forces Google to reissue a refresh token even
//! when the user granted access before.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{error, info};

use super::{OAuthProvider, OAuthTokens};
use crate::common::{create_http_client, GscError, GscResult};
use crate::config::{ClientCredentials, Endpoints};

/// Google OAuth2 provider.
pub struct GoogleProvider {
    credentials: ClientCredentials,
    authorize_endpoint: String,
    token_endpoint: String,
    http: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(credentials: ClientCredentials, endpoints: &Endpoints) -> GscResult<Self> {
        Ok(Self::with_client(credentials, endpoints, create_http_client()?))
    }

    /// Build a provider sharing an existing HTTP client.
    pub fn with_client(
        credentials: ClientCredentials,
        endpoints: &Endpoints,
        http: reqwest::Client,
    ) -> Self {
        Self {
            credentials,
            authorize_endpoint: endpoints.authorize.clone(),
            token_endpoint: endpoints.token.clone(),
            http,
        }
    }

    /// POST a form-encoded request to the token endpoint.
    ///
    /// Secrets travel in the request body, never in the URL.
    async fn post_form(&self, params: &HashMap<&str, &str>) -> GscResult<OAuthTokens> {
        let response = self
            .http
            .post(&self.token_endpoint)
            .form(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Token endpoint returned HTTP {}", status);
        }

        parse_token_response(&body, status.as_u16())
    }
}

impl OAuthProvider for GoogleProvider {
    fn authorize_url(&self, scopes: &[&str], redirect_uri: &str) -> String {
        let scope_str = scopes.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            self.authorize_endpoint,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scope_str),
        )
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> GscResult<OAuthTokens> {
        info!("Exchanging authorization code for tokens");

        let mut params = HashMap::new();
        params.insert("client_id", self.credentials.client_id.as_str());
        params.insert("client_secret", self.credentials.client_secret.as_str());
        params.insert("code", code);
        params.insert("grant_type", "authorization_code");
        params.insert("redirect_uri", redirect_uri);

        self.post_form(&params).await
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> GscResult<OAuthTokens> {
        info!("Refreshing access token");

        let mut params = HashMap::new();
        params.insert("client_id", self.credentials.client_id.as_str());
        params.insert("client_secret", self.credentials.client_secret.as_str());
        params.insert("refresh_token", refresh_token);
        params.insert("grant_type", "refresh_token");

        self.post_form(&params).await
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Parse a Google OAuth2 token response.
fn parse_token_response(body: &str, status: u16) -> GscResult<OAuthTokens> {
    let parsed: TokenResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !(200..300).contains(&status) => {
            return Err(GscError::TokenExchange {
                error: format!("http_{}", status),
                description: body.to_string(),
            });
        }
        Err(e) => return Err(GscError::Decode(format!("invalid token response: {}", e))),
    };

    if let Some(err) = parsed.error {
        return Err(GscError::TokenExchange {
            error: err,
            description: parsed
                .error_description
                .unwrap_or_else(|| "Unknown error".to_string()),
        });
    }

    let access_token = parsed
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| GscError::Decode("Missing access_token in response".to_string()))?;

    let expires_in = parsed.expires_in.unwrap_or(3600);
    let expires_at = chrono::Duration::try_seconds(expires_in)
        .and_then(|lifetime| chrono::Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| GscError::Decode(format!("invalid expires_in: {}", expires_in)))?;

    Ok(OAuthTokens {
        access_token,
        refresh_token: parsed.refresh_token,
        token_type: parsed.token_type.unwrap_or_else(|| "Bearer".to_string()),
        expires_at,
        scopes: parsed
            .scope
            .map(|s| s.split(' ').map(String::from).collect())
            .unwrap_or_default(),
    })
}

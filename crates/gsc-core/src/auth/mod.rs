//! OAuth2 Authorization
//!
//! Authorization-code exchange (offline access) for obtaining a refresh token,
//! and the authenticated session that turns that refresh token into bearer
//! access tokens for API calls.

pub mod google;
pub mod session;

use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::common::{GscError, GscResult};

pub use google::GoogleProvider;
pub use session::Session;

/// Scopes requested for Search Console: read-only and read-write.
pub const SEARCH_CONSOLE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/webmasters.readonly",
    "https://www.googleapis.com/auth/webmasters",
];

/// Redirect sentinel for the copy-paste flow: Google shows the code on screen.
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Tokens returned from an OAuth token exchange or refresh.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[zeroize(skip)]
    pub token_type: String,
    #[zeroize(skip)]
    pub expires_at: DateTime<Utc>,
    #[zeroize(skip)]
    pub scopes: Vec<String>,
}

impl fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// OAuth provider trait.
///
/// Implemented by [`GoogleProvider`]; the callback listener and session are
/// generic over it so tests can substitute a scripted provider.
#[allow(async_fn_in_trait)]
pub trait OAuthProvider {
    /// Build the consent URL for the offline authorization-code flow.
    fn authorize_url(&self, scopes: &[&str], redirect_uri: &str) -> String;

    /// Exchange an authorization code for tokens.
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> GscResult<OAuthTokens>;

    /// Mint a fresh access token from a refresh token.
    async fn refresh_access_token(&self, refresh_token: &str) -> GscResult<OAuthTokens>;
}

/// Exchange a one-time authorization code and insist on a refresh token.
///
/// Both refresh-token front-ends end here. A token response without a
/// refresh token is useless for unattended access and is reported as a
/// failed exchange.
pub async fn obtain_refresh_token<P: OAuthProvider>(
    provider: &P,
    code: &str,
    redirect_uri: &str,
) -> GscResult<String> {
    let code = code.trim();
    if code.is_empty() {
        return Err(GscError::InvalidParams(
            "authorization code is empty".to_string(),
        ));
    }

    let tokens = provider.exchange_code(code, redirect_uri).await?;
    match tokens.refresh_token.as_deref() {
        Some(token) if !token.is_empty() => {
            info!("Authorization code exchanged for a refresh token");
            Ok(token.to_string())
        }
        _ => {
            warn!("Token response did not include a refresh token");
            Err(GscError::TokenExchange {
                error: "missing_refresh_token".to_string(),
                description: "The token response did not include a refresh token. \
                    Revoke the app's access in your Google account and authorize again."
                    .to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedProvider {
        refresh_token: Option<&'static str>,
        exchanges: AtomicUsize,
    }

    impl OAuthProvider for ScriptedProvider {
        fn authorize_url(&self, _scopes: &[&str], _redirect_uri: &str) -> String {
            String::new()
        }

        async fn exchange_code(&self, _code: &str, _redirect_uri: &str) -> GscResult<OAuthTokens> {
            self.exchanges.fetch_add(1, Ordering::SeqCst);
            Ok(OAuthTokens {
                access_token: "ya29.access".to_string(),
                refresh_token: self.refresh_token.map(String::from),
                token_type: "Bearer".to_string(),
                expires_at: Utc::now(),
                scopes: Vec::new(),
            })
        }

        async fn refresh_access_token(&self, _refresh_token: &str) -> GscResult<OAuthTokens> {
            unreachable!("not used by the exchange step")
        }
    }

    #[tokio::test]
    async fn test_obtain_refresh_token_success() {
        let provider = ScriptedProvider {
            refresh_token: Some("1//0e-refresh"),
            exchanges: AtomicUsize::new(0),
        };
        let token = obtain_refresh_token(&provider, "  4/0Ab-code \n", OOB_REDIRECT_URI)
            .await
            .unwrap();
        assert_eq!(token, "1//0e-refresh");
        assert_eq!(provider.exchanges.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_obtain_refresh_token_requires_refresh_token() {
        let provider = ScriptedProvider {
            refresh_token: None,
            exchanges: AtomicUsize::new(0),
        };
        let err = obtain_refresh_token(&provider, "4/0Ab-code", OOB_REDIRECT_URI)
            .await
            .unwrap_err();
        assert!(matches!(err, GscError::TokenExchange { .. }));
    }

    #[tokio::test]
    async fn test_empty_code_skips_exchange() {
        let provider = ScriptedProvider {
            refresh_token: Some("unused"),
            exchanges: AtomicUsize::new(0),
        };
        assert!(obtain_refresh_token(&provider, "   ", OOB_REDIRECT_URI).await.is_err());
        assert_eq!(provider.exchanges.load(Ordering::SeqCst), 0);
    }
}

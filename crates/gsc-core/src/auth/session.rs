//! Authenticated Session
//!
//! Wraps the long-lived refresh token. Access tokens are minted on demand and
//! reused in memory until shortly before they expire; nothing is persisted.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use zeroize::Zeroizing;

use super::{GoogleProvider, OAuthProvider};
use crate::common::GscResult;
use crate::config::{Credentials, Endpoints};

/// Seconds before expiry at which a cached access token is considered stale.
const EXPIRY_MARGIN_SECS: i64 = 60;

struct AccessToken {
    value: Zeroizing<String>,
    expires_at: DateTime<Utc>,
}

/// Refresh-token backed session, constructed once at startup.
pub struct Session<P = GoogleProvider> {
    provider: P,
    refresh_token: Zeroizing<String>,
    current: RwLock<Option<AccessToken>>,
}

impl Session<GoogleProvider> {
    /// Build a Google session from the environment-supplied credential set.
    pub fn from_credentials(
        credentials: &Credentials,
        endpoints: &Endpoints,
        http: reqwest::Client,
    ) -> Self {
        let provider = GoogleProvider::with_client(credentials.client.clone(), endpoints, http);
        Self::new(provider, credentials.refresh_token.clone())
    }
}

impl<P: OAuthProvider> Session<P> {
    pub fn new(provider: P, refresh_token: String) -> Self {
        Self {
            provider,
            refresh_token: Zeroizing::new(refresh_token),
            current: RwLock::new(None),
        }
    }

    /// Return a bearer token valid for at least [`EXPIRY_MARGIN_SECS`].
    pub async fn access_token(&self) -> GscResult<String> {
        {
            let current = self.current.read().await;
            if let Some(token) = current.as_ref() {
                if !is_expiring(token.expires_at, EXPIRY_MARGIN_SECS) {
                    return Ok(token.value.to_string());
                }
            }
        }

        let mut current = self.current.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = current.as_ref() {
            if !is_expiring(token.expires_at, EXPIRY_MARGIN_SECS) {
                return Ok(token.value.to_string());
            }
        }

        let tokens = self.provider.refresh_access_token(&self.refresh_token).await?;
        debug!("Access token refreshed, expires at {}", tokens.expires_at);

        let value = tokens.access_token.clone();
        *current = Some(AccessToken {
            value: Zeroizing::new(value.clone()),
            expires_at: tokens.expires_at,
        });
        Ok(value)
    }
}

/// Check whether `expires_at` is within `margin_secs` of now.
fn is_expiring(expires_at: DateTime<Utc>, margin_secs: i64) -> bool {
    let remaining = expires_at.signed_duration_since(Utc::now()).num_seconds();
    remaining < margin_secs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::OAuthTokens;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        refreshes: AtomicUsize,
        lifetime_secs: i64,
    }

    impl OAuthProvider for CountingProvider {
        fn authorize_url(&self, _scopes: &[&str], _redirect_uri: &str) -> String {
            String::new()
        }

        async fn exchange_code(&self, _code: &str, _redirect_uri: &str) -> GscResult<OAuthTokens> {
            unreachable!("sessions never exchange codes")
        }

        async fn refresh_access_token(&self, refresh_token: &str) -> GscResult<OAuthTokens> {
            assert_eq!(refresh_token, "1//0e-refresh");
            let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(OAuthTokens {
                access_token: format!("ya29.{}", n),
                refresh_token: None,
                token_type: "Bearer".to_string(),
                expires_at: Utc::now() + chrono::Duration::seconds(self.lifetime_secs),
                scopes: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_access_token_is_reused_until_expiry() {
        let session = Session::new(
            CountingProvider {
                refreshes: AtomicUsize::new(0),
                lifetime_secs: 3600,
            },
            "1//0e-refresh".to_string(),
        );

        assert_eq!(session.access_token().await.unwrap(), "ya29.1");
        assert_eq!(session.access_token().await.unwrap(), "ya29.1");
        assert_eq!(session.provider.refreshes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expiring_token_is_refreshed() {
        let session = Session::new(
            CountingProvider {
                refreshes: AtomicUsize::new(0),
                lifetime_secs: 30,
            },
            "1//0e-refresh".to_string(),
        );

        assert_eq!(session.access_token().await.unwrap(), "ya29.1");
        assert_eq!(session.access_token().await.unwrap(), "ya29.2");
    }

    #[test]
    fn test_is_expiring() {
        assert!(is_expiring(Utc::now(), 60));
        assert!(!is_expiring(Utc::now() + chrono::Duration::hours(1), 60));
    }
}

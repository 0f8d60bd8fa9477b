//! Scripted OAuth provider shared by the front-end tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use gsc_core::auth::{OAuthProvider, OAuthTokens};
use gsc_core::{GscError, GscResult};

pub struct TestProvider {
    refresh_token: Option<&'static str>,
    reject: bool,
    delay: StdDuration,
    exchanges: AtomicUsize,
}

impl TestProvider {
    pub fn issuing(refresh_token: &'static str) -> Self {
        Self {
            refresh_token: Some(refresh_token),
            reject: false,
            delay: StdDuration::ZERO,
            exchanges: AtomicUsize::new(0),
        }
    }

    /// Token endpoint answers `invalid_grant`.
    pub fn rejecting() -> Self {
        Self {
            refresh_token: None,
            reject: true,
            delay: StdDuration::ZERO,
            exchanges: AtomicUsize::new(0),
        }
    }

    /// Like `issuing`, but the token endpoint takes `delay` to answer.
    pub fn issuing_after(refresh_token: &'static str, delay: StdDuration) -> Self {
        Self {
            delay,
            ..Self::issuing(refresh_token)
        }
    }

    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

impl OAuthProvider for TestProvider {
    fn authorize_url(&self, scopes: &[&str], redirect_uri: &str) -> String {
        format!(
            "https://accounts.example/auth?redirect_uri={}&scope={}",
            redirect_uri,
            scopes.join("+")
        )
    }

    async fn exchange_code(&self, _code: &str, _redirect_uri: &str) -> GscResult<OAuthTokens> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.reject {
            return Err(GscError::TokenExchange {
                error: "invalid_grant".to_string(),
                description: "Malformed auth code.".to_string(),
            });
        }
        Ok(OAuthTokens {
            access_token: "ya29.access".to_string(),
            refresh_token: self.refresh_token.map(String::from),
            token_type: "Bearer".to_string(),
            expires_at: Utc::now() + Duration::seconds(3600),
            scopes: Vec::new(),
        })
    }

    async fn refresh_access_token(&self, _refresh_token: &str) -> GscResult<OAuthTokens> {
        unreachable!("front-ends only exchange authorization codes")
    }
}

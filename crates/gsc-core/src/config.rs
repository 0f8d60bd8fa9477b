//! Configuration
//!
//! Credentials come from the environment; endpoints default to Google's
//! production hosts.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::common::{GscError, GscResult};

pub const CLIENT_ID_VAR: &str = "GOOGLE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "GOOGLE_CLIENT_SECRET";
pub const REFRESH_TOKEN_VAR: &str = "GOOGLE_REFRESH_TOKEN";

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const API_BASE: &str = "https://searchconsole.googleapis.com";

/// OAuth client registration (Desktop app client in Google Cloud Console).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ClientCredentials {
    #[zeroize(skip)]
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn from_env() -> GscResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> GscResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = non_blank(&lookup, CLIENT_ID_VAR);
        let client_secret = non_blank(&lookup, CLIENT_SECRET_VAR);

        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(Self {
                client_id,
                client_secret,
            }),
            (id, secret) => Err(GscError::MissingCredentials(missing(&[
                (CLIENT_ID_VAR, id.is_some()),
                (CLIENT_SECRET_VAR, secret.is_some()),
            ]))),
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Full credential set required by the MCP server.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub client: ClientCredentials,
    pub refresh_token: String,
}

impl Credentials {
    pub fn from_env() -> GscResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve all three variables, reporting every missing one at once.
    pub fn from_lookup<F>(lookup: F) -> GscResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = non_blank(&lookup, CLIENT_ID_VAR);
        let client_secret = non_blank(&lookup, CLIENT_SECRET_VAR);
        let refresh_token = non_blank(&lookup, REFRESH_TOKEN_VAR);

        match (client_id, client_secret, refresh_token) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => Ok(Self {
                client: ClientCredentials {
                    client_id,
                    client_secret,
                },
                refresh_token,
            }),
            (id, secret, token) => Err(GscError::MissingCredentials(missing(&[
                (CLIENT_ID_VAR, id.is_some()),
                (CLIENT_SECRET_VAR, secret.is_some()),
                (REFRESH_TOKEN_VAR, token.is_some()),
            ]))),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client", &self.client)
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

fn non_blank<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn missing(vars: &[(&'static str, bool)]) -> Vec<&'static str> {
    vars.iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect()
}

/// Remote endpoints used for authorization, token exchange and API calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub authorize: String,
    pub token: String,
    pub api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authorize: AUTHORIZE_ENDPOINT.to_string(),
            token: TOKEN_ENDPOINT.to_string(),
            api_base: API_BASE.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at one host, keeping Google's paths
    /// (`/o/oauth2/v2/auth`, `/token`, REST paths under the root).
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            authorize: format!("{}/o/oauth2/v2/auth", base),
            token: format!("{}/token", base),
            api_base: base.to_string(),
        }
    }
}

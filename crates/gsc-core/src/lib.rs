//! Google Search Console Core
//!
//! Credentials, OAuth2 token handling and the authenticated Search Console
//! REST client shared by the MCP server and the refresh-token helper.

pub mod auth;
pub mod common;
pub mod config;
pub mod google;

pub use common::{ErrorCode, GscError, GscResult};

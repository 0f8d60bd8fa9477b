//! HTTP Client Utilities
//!
//! Shared HTTP client creation with consistent configuration.

use std::time::Duration;

use super::error::GscError;

/// Create a reqwest HTTP client with standard configuration
///
/// - 30 second request timeout
/// - 10 second connect timeout
/// - Reusable across requests (connection pooling)
pub fn create_http_client() -> Result<reqwest::Client, GscError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| GscError::HttpClient(e.to_string()))
}

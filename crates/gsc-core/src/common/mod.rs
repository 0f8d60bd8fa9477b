//! Common Utilities
//!
//! Error taxonomy, result alias and HTTP client construction.

pub mod error;
pub mod http;
pub mod result;

pub use error::{ErrorCode, GscError};
pub use http::create_http_client;
pub use result::GscResult;

//! Common Result Type

use super::error::GscError;

/// Result type used across the crate.
pub type GscResult<T> = Result<T, GscError>;

//! Tool Handlers
//!
//! One module per Search Console resource group. Every handler receives
//! already-validated arguments, performs exactly one client call and projects
//! the response into a fixed output structure.

pub mod search_analytics;
pub mod sitemaps;
pub mod sites;
pub mod url_inspection;

use gsc_core::{GscError, GscResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::schema::{Args, Field, FieldKind};

/// Field shared by every tool that targets one property.
pub const SITE_URL: Field = Field::required(
    "siteUrl",
    FieldKind::String,
    "The site URL as registered in Search Console. Can be a domain property (sc-domain:example.com) \
     or a URL prefix (https://example.com/)",
);

/// Decode validated arguments into a typed parameter struct.
pub fn decode<T: DeserializeOwned>(args: Args) -> GscResult<T> {
    serde_json::from_value(Value::Object(args)).map_err(|e| GscError::InvalidParams(e.to_string()))
}

/// Serialize a projection for the text payload.
pub fn to_output<T: Serialize>(output: &T) -> GscResult<Value> {
    serde_json::to_value(output).map_err(|e| GscError::Decode(e.to_string()))
}

/// Click-through ratio as a percentage with two decimals, e.g. `"12.34%"`.
pub fn format_ctr(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Average position with one decimal, e.g. `"3.2"`.
pub fn format_position(position: f64) -> String {
    format!("{:.1}", position)
}

#[cfg(test)]
pub(crate) mod mock;

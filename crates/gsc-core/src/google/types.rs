//! Search Console wire types
//!
//! Mirrors the `webmasters/v3` and `searchconsole/v1` resource shapes. Field
//! names follow the REST representation (camelCase); int64 counters arrive
//! as JSON strings and are kept that way.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

pub const DEFAULT_ROW_LIMIT: u32 = 1000;
pub const DEFAULT_START_ROW: u32 = 0;

// ── Sites ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WmxSite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitesListResponse {
    #[serde(default)]
    pub site_entry: Vec<WmxSite>,
}

// ── Search analytics ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Query,
    Page,
    Country,
    Device,
    SearchAppearance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    IncludingRegex,
    ExcludingRegex,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupType {
    #[default]
    And,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataState {
    #[default]
    All,
    Final,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilter {
    pub dimension: Dimension,
    pub operator: FilterOperator,
    pub expression: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilterGroup {
    #[serde(default)]
    pub group_type: GroupType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<DimensionFilter>,
}

/// A search analytics query. `site_url` travels in the path; everything else
/// in the request body built by [`SearchAnalyticsQuery::request_body`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalyticsQuery {
    pub site_url: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub dimension_filter_groups: Vec<DimensionFilterGroup>,
    #[serde(default)]
    pub row_limit: Option<u32>,
    #[serde(default)]
    pub start_row: Option<u32>,
    #[serde(default)]
    pub data_state: Option<DataState>,
}

impl SearchAnalyticsQuery {
    /// Query over a date range with no dimensions, filters or paging set.
    pub fn new(site_url: &str, start_date: &str, end_date: &str) -> Self {
        Self {
            site_url: site_url.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            dimensions: Vec::new(),
            dimension_filter_groups: Vec::new(),
            row_limit: None,
            start_row: None,
            data_state: None,
        }
    }

    /// Top-N narrowing: exactly one dimension and a row limit.
    pub fn top(site_url: &str, start_date: &str, end_date: &str, dimension: Dimension, limit: u32) -> Self {
        Self {
            dimensions: vec![dimension],
            row_limit: Some(limit),
            ..Self::new(site_url, start_date, end_date)
        }
    }

    /// Request body with paging and data-state defaults applied.
    pub fn request_body(&self) -> SearchAnalyticsRequest<'_> {
        SearchAnalyticsRequest {
            start_date: &self.start_date,
            end_date: &self.end_date,
            dimensions: &self.dimensions,
            dimension_filter_groups: &self.dimension_filter_groups,
            row_limit: self.row_limit.unwrap_or(DEFAULT_ROW_LIMIT),
            start_row: self.start_row.unwrap_or(DEFAULT_START_ROW),
            data_state: self.data_state.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalyticsRequest<'a> {
    pub start_date: &'a str,
    pub end_date: &'a str,
    #[serde(skip_serializing_if = "is_empty_slice")]
    pub dimensions: &'a [Dimension],
    #[serde(skip_serializing_if = "is_empty_slice")]
    pub dimension_filter_groups: &'a [DimensionFilterGroup],
    pub row_limit: u32,
    pub start_row: u32,
    pub data_state: DataState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalyticsRow {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "metric")]
    pub clicks: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "metric")]
    pub impressions: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalyticsQueryResponse {
    #[serde(default)]
    pub rows: Vec<SearchAnalyticsRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_aggregation_type: Option<String>,
}

fn is_empty_slice<T>(items: &&[T]) -> bool {
    items.is_empty()
}

/// Click and impression counts are doubles on the wire but whole in practice;
/// write whole values without a fractional part.
pub fn metric<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 => {
            serializer.serialize_i64(*v as i64)
        }
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_none(),
    }
}

// ── Sitemaps ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WmxSitemapContent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WmxSitemap {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(rename = "type", default)]
    pub sitemap_type: Option<String>,
    #[serde(default)]
    pub last_submitted: Option<String>,
    #[serde(default)]
    pub last_downloaded: Option<String>,
    #[serde(default)]
    pub is_pending: Option<bool>,
    #[serde(default)]
    pub is_sitemaps_index: Option<bool>,
    #[serde(default)]
    pub warnings: Option<String>,
    #[serde(default)]
    pub errors: Option<String>,
    #[serde(default)]
    pub contents: Option<Vec<WmxSitemapContent>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapsListResponse {
    #[serde(default)]
    pub sitemap: Vec<WmxSitemap>,
}

// ── URL inspection ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectUrlIndexRequest<'a> {
    pub inspection_url: &'a str,
    pub site_url: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatusInspectionResult {
    pub verdict: Option<String>,
    pub coverage_state: Option<String>,
    pub robots_txt_state: Option<String>,
    pub indexing_state: Option<String>,
    pub last_crawl_time: Option<String>,
    pub page_fetch_state: Option<String>,
    pub google_canonical: Option<String>,
    pub user_canonical: Option<String>,
    pub crawled_as: Option<String>,
    pub referring_urls: Option<Vec<String>>,
    pub sitemap: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileUsabilityInspectionResult {
    pub verdict: Option<String>,
    pub issues: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichResultsInspectionResult {
    pub verdict: Option<String>,
    pub detected_items: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmpInspectionResult {
    pub verdict: Option<String>,
    pub amp_url: Option<String>,
    pub amp_index_status_verdict: Option<String>,
    pub issues: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlInspectionResult {
    pub inspection_result_link: Option<String>,
    pub index_status_result: Option<IndexStatusInspectionResult>,
    pub mobile_usability_result: Option<MobileUsabilityInspectionResult>,
    pub rich_results_result: Option<RichResultsInspectionResult>,
    pub amp_result: Option<AmpInspectionResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectUrlIndexResponse {
    pub inspection_result: Option<UrlInspectionResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_defaults() {
        let query = SearchAnalyticsQuery::new("https://example.com/", "2024-01-01", "2024-01-31");
        let body = serde_json::to_value(query.request_body()).unwrap();
        assert_eq!(
            body,
            json!({
                "startDate": "2024-01-01",
                "endDate": "2024-01-31",
                "rowLimit": 1000,
                "startRow": 0,
                "dataState": "all"
            })
        );
    }

    #[test]
    fn test_top_query_has_single_dimension() {
        let query = SearchAnalyticsQuery::top("sc-domain:example.com", "2024-01-01", "2024-01-31", Dimension::Page, 5);
        let body = serde_json::to_value(query.request_body()).unwrap();
        assert_eq!(body["dimensions"], json!(["page"]));
        assert_eq!(body["rowLimit"], json!(5));
    }

    #[test]
    fn test_filter_group_serialization() {
        let query = SearchAnalyticsQuery {
            dimensions: vec![Dimension::SearchAppearance, Dimension::Device],
            dimension_filter_groups: vec![DimensionFilterGroup {
                group_type: GroupType::And,
                filters: vec![DimensionFilter {
                    dimension: Dimension::Country,
                    operator: FilterOperator::NotContains,
                    expression: "usa".to_string(),
                }],
            }],
            data_state: Some(DataState::Final),
            ..SearchAnalyticsQuery::new("https://example.com/", "2024-01-01", "2024-01-31")
        };
        let body = serde_json::to_value(query.request_body()).unwrap();
        assert_eq!(body["dimensions"], json!(["searchAppearance", "device"]));
        assert_eq!(
            body["dimensionFilterGroups"],
            json!([{"groupType": "and", "filters": [{"dimension": "country", "operator": "notContains", "expression": "usa"}]}])
        );
        assert_eq!(body["dataState"], json!("final"));
    }

    #[test]
    fn test_row_metrics_serialize_whole_numbers() {
        let row: SearchAnalyticsRow = serde_json::from_value(json!({
            "keys": ["rust"], "clicks": 12.0, "impressions": 340, "ctr": 0.0353, "position": 4.27
        }))
        .unwrap();
        let out = serde_json::to_value(&row).unwrap();
        assert_eq!(out["clicks"], json!(12));
        assert_eq!(out["impressions"], json!(340));
        assert_eq!(out["ctr"], json!(0.0353));
    }
}

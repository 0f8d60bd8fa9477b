//! URL inspection tool.

use gsc_core::google::{
    AmpInspectionResult, IndexStatusInspectionResult, MobileUsabilityInspectionResult,
    RichResultsInspectionResult, SearchConsole,
};
use gsc_core::GscResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode, to_output, SITE_URL};
use crate::schema::{Args, Field, FieldKind};

pub const INSPECT_URL_FIELDS: &[Field] = &[
    SITE_URL,
    Field::required(
        "inspectionUrl",
        FieldKind::Url,
        "The fully-qualified URL to inspect",
    ),
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InspectArgs {
    site_url: String,
    inspection_url: String,
}

/// Sections absent from the response are written as `null`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectionOutput {
    inspection_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    inspection_result_link: Option<String>,
    index_status_result: Option<IndexStatus>,
    mobile_usability_result: Option<MobileUsability>,
    rich_results_result: Option<RichResults>,
    amp_result: Option<Amp>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    verdict: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coverage_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    robots_txt_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indexing_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_crawl_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_fetch_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    google_canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    crawled_as: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    referring_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sitemap: Option<Vec<String>>,
}

impl From<IndexStatusInspectionResult> for IndexStatus {
    fn from(r: IndexStatusInspectionResult) -> Self {
        Self {
            verdict: r.verdict,
            coverage_state: r.coverage_state,
            robots_txt_state: r.robots_txt_state,
            indexing_state: r.indexing_state,
            last_crawl_time: r.last_crawl_time,
            page_fetch_state: r.page_fetch_state,
            google_canonical: r.google_canonical,
            user_canonical: r.user_canonical,
            crawled_as: r.crawled_as,
            referring_urls: r.referring_urls,
            sitemap: r.sitemap,
        }
    }
}

#[derive(Debug, Serialize)]
struct MobileUsability {
    #[serde(skip_serializing_if = "Option::is_none")]
    verdict: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<Vec<Value>>,
}

impl From<MobileUsabilityInspectionResult> for MobileUsability {
    fn from(r: MobileUsabilityInspectionResult) -> Self {
        Self {
            verdict: r.verdict,
            issues: r.issues,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RichResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    verdict: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detected_items: Option<Vec<Value>>,
}

impl From<RichResultsInspectionResult> for RichResults {
    fn from(r: RichResultsInspectionResult) -> Self {
        Self {
            verdict: r.verdict,
            detected_items: r.detected_items,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Amp {
    #[serde(skip_serializing_if = "Option::is_none")]
    verdict: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amp_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amp_index_status_verdict: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<Vec<Value>>,
}

impl From<AmpInspectionResult> for Amp {
    fn from(r: AmpInspectionResult) -> Self {
        Self {
            verdict: r.verdict,
            amp_url: r.amp_url,
            amp_index_status_verdict: r.amp_index_status_verdict,
            issues: r.issues,
        }
    }
}

pub async fn inspect_url<S: SearchConsole>(api: &S, args: Args) -> GscResult<Value> {
    let args: InspectArgs = decode(args)?;
    let response = api.inspect_url(&args.site_url, &args.inspection_url).await?;
    let result = response.inspection_result.unwrap_or_default();

    to_output(&InspectionOutput {
        inspection_url: args.inspection_url,
        inspection_result_link: result.inspection_result_link,
        index_status_result: result.index_status_result.map(IndexStatus::from),
        mobile_usability_result: result.mobile_usability_result.map(MobileUsability::from),
        rich_results_result: result.rich_results_result.map(RichResults::from),
        amp_result: result.amp_result.map(Amp::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::mock::MockSearchConsole;
    use crate::schema::validate;
    use gsc_core::google::{InspectUrlIndexResponse, UrlInspectionResult};
    use serde_json::json;

    #[tokio::test]
    async fn test_inspect_projection_with_null_sections() {
        let api = MockSearchConsole {
            inspection: InspectUrlIndexResponse {
                inspection_result: Some(UrlInspectionResult {
                    inspection_result_link: Some("https://search.google.com/search-console/inspect?id=1".to_string()),
                    index_status_result: Some(IndexStatusInspectionResult {
                        verdict: Some("PASS".to_string()),
                        coverage_state: Some("Submitted and indexed".to_string()),
                        referring_urls: Some(vec!["https://example.com/".to_string()]),
                        ..Default::default()
                    }),
                    mobile_usability_result: Some(MobileUsabilityInspectionResult {
                        verdict: Some("PASS".to_string()),
                        issues: None,
                    }),
                    ..Default::default()
                }),
            },
            ..MockSearchConsole::new()
        };
        let args = validate(
            INSPECT_URL_FIELDS,
            &json!({"siteUrl": "https://example.com/", "inspectionUrl": "https://example.com/blog/post"}),
        )
        .unwrap();

        let out = inspect_url(&api, args).await.unwrap();

        assert_eq!(out["inspectionUrl"], "https://example.com/blog/post");
        assert_eq!(out["indexStatusResult"]["coverageState"], "Submitted and indexed");
        assert_eq!(out["indexStatusResult"]["referringUrls"], json!(["https://example.com/"]));
        assert_eq!(out["mobileUsabilityResult"], json!({"verdict": "PASS"}));
        assert_eq!(out["richResultsResult"], Value::Null);
        assert_eq!(out["ampResult"], Value::Null);
        assert!(out.as_object().unwrap().contains_key("ampResult"));
    }

    #[tokio::test]
    async fn test_empty_inspection_result() {
        let api = MockSearchConsole::new();
        let args = validate(
            INSPECT_URL_FIELDS,
            &json!({"siteUrl": "sc-domain:example.com", "inspectionUrl": "https://example.com/"}),
        )
        .unwrap();

        let out = inspect_url(&api, args).await.unwrap();
        assert_eq!(
            out,
            json!({
                "inspectionUrl": "https://example.com/",
                "indexStatusResult": null,
                "mobileUsabilityResult": null,
                "richResultsResult": null,
                "ampResult": null
            })
        );
    }

    #[test]
    fn test_malformed_url_rejected() {
        let err = validate(
            INSPECT_URL_FIELDS,
            &json!({"siteUrl": "https://example.com/", "inspectionUrl": "not a url"}),
        )
        .unwrap_err();
        assert_eq!(err.field, "inspectionUrl");
    }
}

//! Sitemap tools: list, get, submit and delete.

use gsc_core::google::{SearchConsole, WmxSitemap, WmxSitemapContent};
use gsc_core::GscResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{decode, to_output, SITE_URL};
use crate::schema::{Args, Field, FieldKind};

pub const LIST_SITEMAPS_FIELDS: &[Field] = &[SITE_URL];

pub const SITEMAP_FIELDS: &[Field] = &[
    SITE_URL,
    Field::required(
        "feedpath",
        FieldKind::String,
        "URL of the sitemap (e.g., https://example.com/sitemap.xml)",
    ),
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteArgs {
    site_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SitemapArgs {
    site_url: String,
    feedpath: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SitemapSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    sitemap_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_submitted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_downloaded: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_pending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_sitemaps_index: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contents: Option<Vec<WmxSitemapContent>>,
}

impl From<WmxSitemap> for SitemapSummary {
    fn from(sitemap: WmxSitemap) -> Self {
        Self {
            path: sitemap.path,
            sitemap_type: sitemap.sitemap_type,
            last_submitted: sitemap.last_submitted,
            last_downloaded: sitemap.last_downloaded,
            is_pending: sitemap.is_pending,
            is_sitemaps_index: sitemap.is_sitemaps_index,
            warnings: sitemap.warnings,
            errors: sitemap.errors,
            contents: sitemap.contents,
        }
    }
}

#[derive(Debug, Serialize)]
struct SitemapsOutput {
    sitemaps: Vec<SitemapSummary>,
}

#[derive(Debug, Serialize)]
struct Acknowledgement {
    success: bool,
    message: String,
}

pub async fn list_sitemaps<S: SearchConsole>(api: &S, args: Args) -> GscResult<Value> {
    let args: SiteArgs = decode(args)?;
    let response = api.list_sitemaps(&args.site_url).await?;

    to_output(&SitemapsOutput {
        sitemaps: response.sitemap.into_iter().map(SitemapSummary::from).collect(),
    })
}

pub async fn get_sitemap<S: SearchConsole>(api: &S, args: Args) -> GscResult<Value> {
    let args: SitemapArgs = decode(args)?;
    let sitemap = api.get_sitemap(&args.site_url, &args.feedpath).await?;
    to_output(&SitemapSummary::from(sitemap))
}

pub async fn submit_sitemap<S: SearchConsole>(api: &S, args: Args) -> GscResult<Value> {
    let args: SitemapArgs = decode(args)?;
    api.submit_sitemap(&args.site_url, &args.feedpath).await?;
    info!("Submitted sitemap {} for {}", args.feedpath, args.site_url);

    to_output(&Acknowledgement {
        success: true,
        message: format!(
            "Sitemap {} submitted successfully for {}",
            args.feedpath, args.site_url
        ),
    })
}

pub async fn delete_sitemap<S: SearchConsole>(api: &S, args: Args) -> GscResult<Value> {
    let args: SitemapArgs = decode(args)?;
    api.delete_sitemap(&args.site_url, &args.feedpath).await?;
    info!("Deleted sitemap {} from {}", args.feedpath, args.site_url);

    to_output(&Acknowledgement {
        success: true,
        message: format!(
            "Sitemap {} deleted successfully from {}",
            args.feedpath, args.site_url
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::mock::MockSearchConsole;
    use crate::schema::validate;
    use serde_json::json;

    const SITE: &str = "https://example.com/";
    const FEED: &str = "https://example.com/sitemap.xml";

    fn sitemap_args() -> Args {
        validate(SITEMAP_FIELDS, &json!({"siteUrl": SITE, "feedpath": FEED})).unwrap()
    }

    fn site_args() -> Args {
        validate(LIST_SITEMAPS_FIELDS, &json!({"siteUrl": SITE})).unwrap()
    }

    #[tokio::test]
    async fn test_submit_then_delete_removes_path() {
        let api = MockSearchConsole::new();

        let out = submit_sitemap(&api, sitemap_args()).await.unwrap();
        assert_eq!(
            out,
            json!({
                "success": true,
                "message": "Sitemap https://example.com/sitemap.xml submitted successfully for https://example.com/"
            })
        );

        let listed = list_sitemaps(&api, site_args()).await.unwrap();
        assert_eq!(listed["sitemaps"][0]["path"], FEED);

        let out = delete_sitemap(&api, sitemap_args()).await.unwrap();
        assert_eq!(
            out["message"],
            "Sitemap https://example.com/sitemap.xml deleted successfully from https://example.com/"
        );

        let listed = list_sitemaps(&api, site_args()).await.unwrap();
        assert_eq!(listed, json!({"sitemaps": []}));
        assert_eq!(api.calls(), 4);
    }

    #[tokio::test]
    async fn test_get_sitemap_summary() {
        let api = MockSearchConsole::new();
        api.sitemaps.lock().unwrap().insert(
            SITE.to_string(),
            vec![WmxSitemap {
                path: Some(FEED.to_string()),
                sitemap_type: Some("sitemap".to_string()),
                last_submitted: Some("2024-02-01T10:00:00Z".to_string()),
                is_pending: Some(false),
                is_sitemaps_index: Some(false),
                warnings: Some("0".to_string()),
                errors: Some("2".to_string()),
                contents: Some(vec![WmxSitemapContent {
                    content_type: Some("web".to_string()),
                    submitted: Some("120".to_string()),
                    indexed: Some("98".to_string()),
                }]),
                ..WmxSitemap::default()
            }],
        );

        let out = get_sitemap(&api, sitemap_args()).await.unwrap();
        assert_eq!(out["type"], "sitemap");
        assert_eq!(out["errors"], "2");
        assert_eq!(out["contents"][0], json!({"type": "web", "submitted": "120", "indexed": "98"}));
        assert!(out.get("lastDownloaded").is_none());
    }

    #[tokio::test]
    async fn test_get_missing_sitemap_is_remote_error() {
        let api = MockSearchConsole::new();
        let err = get_sitemap(&api, sitemap_args()).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_feedpath_required() {
        let err = validate(SITEMAP_FIELDS, &json!({"siteUrl": SITE})).unwrap_err();
        assert_eq!(err.field, "feedpath");
    }
}

//! Sites tools: `list_sites`, `get_site`.

use gsc_core::google::{SearchConsole, WmxSite};
use gsc_core::GscResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{decode, to_output, SITE_URL};
use crate::schema::{Args, Field};

pub const LIST_SITES_FIELDS: &[Field] = &[];
pub const GET_SITE_FIELDS: &[Field] = &[SITE_URL];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteArgs {
    site_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    site_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permission_level: Option<String>,
}

impl From<WmxSite> for SiteSummary {
    fn from(site: WmxSite) -> Self {
        Self {
            site_url: site.site_url,
            permission_level: site.permission_level,
        }
    }
}

#[derive(Debug, Serialize)]
struct SitesOutput {
    sites: Vec<SiteSummary>,
}

pub async fn list_sites<S: SearchConsole>(api: &S, _args: Args) -> GscResult<Value> {
    let response = api.list_sites().await?;
    debug!("list_sites returned {} entries", response.site_entry.len());

    to_output(&SitesOutput {
        sites: response.site_entry.into_iter().map(SiteSummary::from).collect(),
    })
}

pub async fn get_site<S: SearchConsole>(api: &S, args: Args) -> GscResult<Value> {
    let args: SiteArgs = decode(args)?;
    let site = api.get_site(&args.site_url).await?;
    to_output(&SiteSummary::from(site))
}

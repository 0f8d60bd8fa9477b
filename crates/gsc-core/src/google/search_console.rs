//! Google Search Console REST Client
//!
//! Provides methods for interacting with the Search Console API:
//! - Sites (list / get)
//! - Search analytics queries
//! - Sitemaps (list / get / submit / delete)
//! - URL inspection
//!
//! Site URLs and feed paths are percent-encoded into path segments, so both
//! URL-prefix (`https://example.com/`) and domain (`sc-domain:example.com`)
//! properties work.

use tracing::{debug, info};

use super::client::GoogleClient;
use super::types::*;
use super::SearchConsole;
use crate::auth::{GoogleProvider, OAuthProvider, Session};
use crate::common::{create_http_client, GscResult};
use crate::config::{Credentials, Endpoints};

pub struct SearchConsoleApi<P = GoogleProvider> {
    client: GoogleClient<P>,
    api_base: String,
}

impl SearchConsoleApi<GoogleProvider> {
    /// Build the API from environment credentials. One HTTP client is shared
    /// between token refreshes and API calls.
    pub fn connect(credentials: &Credentials, endpoints: &Endpoints) -> GscResult<Self> {
        let http = create_http_client()?;
        let session = Session::from_credentials(credentials, endpoints, http.clone());
        Ok(Self::new(GoogleClient::new(http, session), endpoints))
    }
}

impl<P: OAuthProvider> SearchConsoleApi<P> {
    pub fn new(client: GoogleClient<P>, endpoints: &Endpoints) -> Self {
        Self {
            client,
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn site_url(&self, site_url: &str) -> String {
        format!(
            "{}/webmasters/v3/sites/{}",
            self.api_base,
            urlencoding::encode(site_url)
        )
    }

    fn sitemap_url(&self, site_url: &str, feedpath: &str) -> String {
        format!(
            "{}/sitemaps/{}",
            self.site_url(site_url),
            urlencoding::encode(feedpath)
        )
    }
}

impl<P: OAuthProvider> SearchConsole for SearchConsoleApi<P> {
    async fn list_sites(&self) -> GscResult<SitesListResponse> {
        info!("Listing Search Console sites");

        let url = format!("{}/webmasters/v3/sites", self.api_base);
        let response: SitesListResponse = self.client.get(&url).await?;

        debug!("Retrieved {} sites", response.site_entry.len());
        Ok(response)
    }

    async fn get_site(&self, site_url: &str) -> GscResult<WmxSite> {
        info!("Fetching site: {}", site_url);
        self.client.get(&self.site_url(site_url)).await
    }

    async fn query_search_analytics(
        &self,
        query: &SearchAnalyticsQuery,
    ) -> GscResult<SearchAnalyticsQueryResponse> {
        info!(
            "Querying search analytics for {} ({} to {})",
            query.site_url, query.start_date, query.end_date
        );

        let url = format!("{}/searchAnalytics/query", self.site_url(&query.site_url));
        let response: SearchAnalyticsQueryResponse =
            self.client.post(&url, &query.request_body()).await?;

        debug!("Retrieved {} rows", response.rows.len());
        Ok(response)
    }

    async fn list_sitemaps(&self, site_url: &str) -> GscResult<SitemapsListResponse> {
        info!("Listing sitemaps for {}", site_url);

        let url = format!("{}/sitemaps", self.site_url(site_url));
        self.client.get(&url).await
    }

    async fn get_sitemap(&self, site_url: &str, feedpath: &str) -> GscResult<WmxSitemap> {
        info!("Fetching sitemap {} for {}", feedpath, site_url);
        self.client.get(&self.sitemap_url(site_url, feedpath)).await
    }

    async fn submit_sitemap(&self, site_url: &str, feedpath: &str) -> GscResult<()> {
        info!("Submitting sitemap {} for {}", feedpath, site_url);
        self.client
            .put_empty(&self.sitemap_url(site_url, feedpath))
            .await
    }

    async fn delete_sitemap(&self, site_url: &str, feedpath: &str) -> GscResult<()> {
        info!("Deleting sitemap {} from {}", feedpath, site_url);
        self.client.delete(&self.sitemap_url(site_url, feedpath)).await
    }

    async fn inspect_url(
        &self,
        site_url: &str,
        inspection_url: &str,
    ) -> GscResult<InspectUrlIndexResponse> {
        info!("Inspecting {} in {}", inspection_url, site_url);

        let url = format!("{}/v1/urlInspection/index:inspect", self.api_base);
        let body = InspectUrlIndexRequest {
            inspection_url,
            site_url,
        };
        self.client.post::<_, InspectUrlIndexResponse>(&url, &body).await
    }
}

//! Google Search Console API
//!
//! Typed access to the four resource groups (sites, search analytics,
//! sitemaps, URL inspection). Every method is one remote call whose response
//! is returned unmodified.

pub mod client;
pub mod search_console;
pub mod types;

pub use client::GoogleClient;
pub use search_console::SearchConsoleApi;
pub use types::*;

use crate::common::GscResult;

/// Search Console operations.
///
/// Implemented by [`SearchConsoleApi`] for the live REST service; tool
/// handlers are generic over it.
#[allow(async_fn_in_trait)]
pub trait SearchConsole {
    /// List properties the authenticated user can access.
    async fn list_sites(&self) -> GscResult<SitesListResponse>;

    /// Fetch one property and its permission level.
    async fn get_site(&self, site_url: &str) -> GscResult<WmxSite>;

    /// Run a dimensioned, filtered, paginated search analytics query.
    async fn query_search_analytics(
        &self,
        query: &SearchAnalyticsQuery,
    ) -> GscResult<SearchAnalyticsQueryResponse>;

    /// Top rows grouped by search query.
    async fn get_top_queries(
        &self,
        site_url: &str,
        start_date: &str,
        end_date: &str,
        limit: u32,
    ) -> GscResult<Vec<SearchAnalyticsRow>> {
        let query = SearchAnalyticsQuery::top(site_url, start_date, end_date, Dimension::Query, limit);
        Ok(self.query_search_analytics(&query).await?.rows)
    }

    /// Top rows grouped by page URL.
    async fn get_top_pages(
        &self,
        site_url: &str,
        start_date: &str,
        end_date: &str,
        limit: u32,
    ) -> GscResult<Vec<SearchAnalyticsRow>> {
        let query = SearchAnalyticsQuery::top(site_url, start_date, end_date, Dimension::Page, limit);
        Ok(self.query_search_analytics(&query).await?.rows)
    }

    async fn list_sitemaps(&self, site_url: &str) -> GscResult<SitemapsListResponse>;

    async fn get_sitemap(&self, site_url: &str, feedpath: &str) -> GscResult<WmxSitemap>;

    /// Submit (or resubmit) a sitemap. Idempotent on the remote side.
    async fn submit_sitemap(&self, site_url: &str, feedpath: &str) -> GscResult<()>;

    async fn delete_sitemap(&self, site_url: &str, feedpath: &str) -> GscResult<()>;

    /// Index status, mobile usability, rich results and AMP state of one URL.
    async fn inspect_url(
        &self,
        site_url: &str,
        inspection_url: &str,
    ) -> GscResult<InspectUrlIndexResponse>;
}

//! In-memory Search Console double for handler and dispatch tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use gsc_core::google::*;
use gsc_core::{GscError, GscResult};

#[derive(Default)]
pub struct MockSearchConsole {
    pub sites: Vec<WmxSite>,
    pub rows: Vec<SearchAnalyticsRow>,
    pub inspection: InspectUrlIndexResponse,
    pub fail_with: Option<(u16, String)>,
    pub sitemaps: Mutex<HashMap<String, Vec<WmxSitemap>>>,
    pub queries: Mutex<Vec<SearchAnalyticsQuery>>,
    pub calls: AtomicUsize,
}

impl MockSearchConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<SearchAnalyticsRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn failing(code: u16, message: &str) -> Self {
        Self {
            fail_with: Some((code, message.to_string())),
            ..Self::default()
        }
    }

    /// Number of remote calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<SearchAnalyticsQuery> {
        self.queries.lock().unwrap().last().cloned()
    }

    fn record(&self) -> GscResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some((code, message)) => Err(GscError::Api {
                code: *code,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl SearchConsole for MockSearchConsole {
    async fn list_sites(&self) -> GscResult<SitesListResponse> {
        self.record()?;
        Ok(SitesListResponse {
            site_entry: self.sites.clone(),
        })
    }

    async fn get_site(&self, site_url: &str) -> GscResult<WmxSite> {
        self.record()?;
        self.sites
            .iter()
            .find(|s| s.site_url.as_deref() == Some(site_url))
            .cloned()
            .ok_or_else(|| GscError::Api {
                code: 404,
                message: format!("Site {} not found", site_url),
            })
    }

    async fn query_search_analytics(
        &self,
        query: &SearchAnalyticsQuery,
    ) -> GscResult<SearchAnalyticsQueryResponse> {
        self.record()?;
        self.queries.lock().unwrap().push(query.clone());
        let limit = query.request_body().row_limit as usize;
        Ok(SearchAnalyticsQueryResponse {
            rows: self.rows.iter().take(limit).cloned().collect(),
            response_aggregation_type: Some("byProperty".to_string()),
        })
    }

    async fn list_sitemaps(&self, site_url: &str) -> GscResult<SitemapsListResponse> {
        self.record()?;
        let sitemaps = self.sitemaps.lock().unwrap();
        Ok(SitemapsListResponse {
            sitemap: sitemaps.get(site_url).cloned().unwrap_or_default(),
        })
    }

    async fn get_sitemap(&self, site_url: &str, feedpath: &str) -> GscResult<WmxSitemap> {
        self.record()?;
        let sitemaps = self.sitemaps.lock().unwrap();
        sitemaps
            .get(site_url)
            .and_then(|list| list.iter().find(|s| s.path.as_deref() == Some(feedpath)))
            .cloned()
            .ok_or_else(|| GscError::Api {
                code: 404,
                message: "Requested entity was not found.".to_string(),
            })
    }

    async fn submit_sitemap(&self, site_url: &str, feedpath: &str) -> GscResult<()> {
        self.record()?;
        let mut sitemaps = self.sitemaps.lock().unwrap();
        let list = sitemaps.entry(site_url.to_string()).or_default();
        if !list.iter().any(|s| s.path.as_deref() == Some(feedpath)) {
            list.push(WmxSitemap {
                path: Some(feedpath.to_string()),
                is_pending: Some(true),
                ..WmxSitemap::default()
            });
        }
        Ok(())
    }

    async fn delete_sitemap(&self, site_url: &str, feedpath: &str) -> GscResult<()> {
        self.record()?;
        let mut sitemaps = self.sitemaps.lock().unwrap();
        if let Some(list) = sitemaps.get_mut(site_url) {
            list.retain(|s| s.path.as_deref() != Some(feedpath));
        }
        Ok(())
    }

    async fn inspect_url(
        &self,
        _site_url: &str,
        _inspection_url: &str,
    ) -> GscResult<InspectUrlIndexResponse> {
        self.record()?;
        Ok(self.inspection.clone())
    }
}

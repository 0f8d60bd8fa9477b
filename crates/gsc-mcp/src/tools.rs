use gsc_core::google::SearchConsole;
use gsc_core::GscError;
use serde_json::Value;
use tracing::{debug, warn};

use crate::handlers::{search_analytics, sitemaps, sites, url_inspection};
use crate::protocol::{McpTool, ToolAnnotations, ToolsCallResponse, ToolsListResponse};
use crate::schema::{json_schema, validate, Field, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolId {
    ListSites,
    GetSite,
    QuerySearchAnalytics,
    GetTopQueries,
    GetTopPages,
    ListSitemaps,
    GetSitemap,
    SubmitSitemap,
    DeleteSitemap,
    InspectUrl,
}

struct ToolDef {
    id: ToolId,
    name: &'static str,
    description: &'static str,
    fields: &'static [Field],
    annotations: ToolAnnotations,
}

const READ_ONLY: ToolAnnotations = ToolAnnotations {
    read_only_hint: Some(true),
    destructive_hint: None,
    idempotent_hint: None,
    open_world_hint: Some(true),
};

const IDEMPOTENT_WRITE: ToolAnnotations = ToolAnnotations {
    read_only_hint: Some(false),
    destructive_hint: Some(false),
    idempotent_hint: Some(true),
    open_world_hint: Some(true),
};

const DESTRUCTIVE: ToolAnnotations = ToolAnnotations {
    read_only_hint: Some(false),
    destructive_hint: Some(true),
    idempotent_hint: Some(true),
    open_world_hint: Some(true),
};

const TOOLS: &[ToolDef] = &[
    ToolDef {
        id: ToolId::ListSites,
        name: "list_sites",
        description: "List all sites (properties) that the user has access to in Google Search Console. \
                      Returns site URLs and permission levels.",
        fields: sites::LIST_SITES_FIELDS,
        annotations: READ_ONLY,
    },
    ToolDef {
        id: ToolId::GetSite,
        name: "get_site",
        description: "Get details for a specific site in Google Search Console, including permission level.",
        fields: sites::GET_SITE_FIELDS,
        annotations: READ_ONLY,
    },
    ToolDef {
        id: ToolId::QuerySearchAnalytics,
        name: "query_search_analytics",
        description: "Query Google Search Console search analytics data. Returns clicks, impressions, CTR, \
                      and position metrics grouped by specified dimensions.",
        fields: search_analytics::QUERY_FIELDS,
        annotations: READ_ONLY,
    },
    ToolDef {
        id: ToolId::GetTopQueries,
        name: "get_top_queries",
        description: "Get the top search queries for a site. Returns queries ranked by clicks with \
                      impressions, CTR, and average position.",
        fields: search_analytics::TOP_QUERIES_FIELDS,
        annotations: READ_ONLY,
    },
    ToolDef {
        id: ToolId::GetTopPages,
        name: "get_top_pages",
        description: "Get the top performing pages for a site. Returns pages ranked by clicks with \
                      impressions, CTR, and average position.",
        fields: search_analytics::TOP_PAGES_FIELDS,
        annotations: READ_ONLY,
    },
    ToolDef {
        id: ToolId::ListSitemaps,
        name: "list_sitemaps",
        description: "List all sitemaps submitted for a site in Google Search Console.",
        fields: sitemaps::LIST_SITEMAPS_FIELDS,
        annotations: READ_ONLY,
    },
    ToolDef {
        id: ToolId::GetSitemap,
        name: "get_sitemap",
        description: "Get details for a specific sitemap, including indexing status and any errors.",
        fields: sitemaps::SITEMAP_FIELDS,
        annotations: READ_ONLY,
    },
    ToolDef {
        id: ToolId::SubmitSitemap,
        name: "submit_sitemap",
        description: "Submit a new sitemap to Google Search Console for indexing.",
        fields: sitemaps::SITEMAP_FIELDS,
        annotations: IDEMPOTENT_WRITE,
    },
    ToolDef {
        id: ToolId::DeleteSitemap,
        name: "delete_sitemap",
        description: "Delete a sitemap from Google Search Console.",
        fields: sitemaps::SITEMAP_FIELDS,
        annotations: DESTRUCTIVE,
    },
    ToolDef {
        id: ToolId::InspectUrl,
        name: "inspect_url",
        description: "Inspect a URL to get indexing information from Google Search Console. Returns coverage \
                      state, indexing status, crawl info, and mobile usability.",
        fields: url_inspection::INSPECT_URL_FIELDS,
        annotations: READ_ONLY,
    },
];

fn find_tool(name: &str) -> Option<&'static ToolDef> {
    TOOLS.iter().find(|t| t.name == name)
}

/// Dispatches `tools/call` to the Search Console handlers.
pub struct ToolRegistry<S> {
    api: S,
}

impl<S: SearchConsole> ToolRegistry<S> {
    pub fn new(api: S) -> Self {
        Self { api }
    }

    #[cfg(test)]
    pub fn api(&self) -> &S {
        &self.api
    }

    pub fn list_response(&self) -> ToolsListResponse {
        let tools = TOOLS
            .iter()
            .map(|t| McpTool {
                name: t.name,
                description: t.description,
                input_schema: json_schema(t.fields),
                annotations: t.annotations,
            })
            .collect();

        ToolsListResponse { tools }
    }

    /// Validate `arguments`, run the tool and wrap its output. Remote failures
    /// come back as an `isError` result; bad arguments never reach the API.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolsCallResponse, ToolCallError> {
        let Some(tool) = find_tool(name) else {
            return Err(ToolCallError::UnknownTool(name.to_string()));
        };

        let args = validate(tool.fields, &arguments).map_err(ToolCallError::InvalidParams)?;
        debug!("Calling tool {}", tool.name);

        let api = &self.api;
        let result = match tool.id {
            ToolId::ListSites => sites::list_sites(api, args).await,
            ToolId::GetSite => sites::get_site(api, args).await,
            ToolId::QuerySearchAnalytics => search_analytics::query_search_analytics(api, args).await,
            ToolId::GetTopQueries => search_analytics::get_top_queries(api, args).await,
            ToolId::GetTopPages => search_analytics::get_top_pages(api, args).await,
            ToolId::ListSitemaps => sitemaps::list_sitemaps(api, args).await,
            ToolId::GetSitemap => sitemaps::get_sitemap(api, args).await,
            ToolId::SubmitSitemap => sitemaps::submit_sitemap(api, args).await,
            ToolId::DeleteSitemap => sitemaps::delete_sitemap(api, args).await,
            ToolId::InspectUrl => url_inspection::inspect_url(api, args).await,
        };

        match result {
            Ok(output) => Ok(ToolsCallResponse::json(&output)),
            Err(GscError::InvalidParams(reason)) => Err(ToolCallError::InvalidParams(ValidationError {
                field: "arguments".to_string(),
                reason,
            })),
            Err(e) => {
                warn!("Tool {} failed: {}", tool.name, e);
                Ok(ToolsCallResponse::failure(&e))
            }
        }
    }
}

#[derive(Debug)]
pub enum ToolCallError {
    UnknownTool(String),
    InvalidParams(ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::mock::MockSearchConsole;
    use serde_json::json;

    #[test]
    fn test_list_has_all_tools() {
        let registry = ToolRegistry::new(MockSearchConsole::new());
        let list = registry.list_response();
        let names: Vec<&str> = list.tools.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            [
                "list_sites",
                "get_site",
                "query_search_analytics",
                "get_top_queries",
                "get_top_pages",
                "list_sitemaps",
                "get_sitemap",
                "submit_sitemap",
                "delete_sitemap",
                "inspect_url",
            ]
        );

        let delete = list.tools.iter().find(|t| t.name == "delete_sitemap").unwrap();
        let annotations = &delete.annotations;
        assert_eq!(annotations.destructive_hint, Some(true));

        let inspect = list.tools.iter().find(|t| t.name == "inspect_url").unwrap();
        assert_eq!(inspect.input_schema["required"], json!(["siteUrl", "inspectionUrl"]));
        assert_eq!(inspect.input_schema["properties"]["inspectionUrl"]["format"], "uri");
    }

    #[test]
    fn test_tool_names_unique() {
        for (i, tool) in TOOLS.iter().enumerate() {
            assert!(TOOLS[i + 1..].iter().all(|t| t.name != tool.name), "{}", tool.name);
        }
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new(MockSearchConsole::new());
        let err = registry.call_tool("drop_site", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolCallError::UnknownTool(name) if name == "drop_site"));
    }

    #[tokio::test]
    async fn test_invalid_row_limit_never_reaches_api() {
        let registry = ToolRegistry::new(MockSearchConsole::new());
        let err = registry
            .call_tool(
                "query_search_analytics",
                json!({"siteUrl": "https://example.com/", "startDate": "2024-01-01", "endDate": "2024-01-31", "rowLimit": 25001}),
            )
            .await
            .unwrap_err();

        match err {
            ToolCallError::InvalidParams(e) => assert_eq!(e.field, "rowLimit"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(registry.api().calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_inspection_url_never_reaches_api() {
        let registry = ToolRegistry::new(MockSearchConsole::new());
        let err = registry
            .call_tool("inspect_url", json!({"siteUrl": "https://example.com/", "inspectionUrl": "example"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolCallError::InvalidParams(ref e) if e.field == "inspectionUrl"));
        assert_eq!(registry.api().calls(), 0);
    }

    #[tokio::test]
    async fn test_success_is_pretty_json_text() {
        let registry = ToolRegistry::new(MockSearchConsole::new());
        let response = registry.call_tool("list_sites", Value::Null).await.unwrap();
        assert!(!response.is_error);
        assert_eq!(response.content[0].content_type, "text");
        assert_eq!(response.content[0].text, "{\n  \"sites\": []\n}");
    }

    #[tokio::test]
    async fn test_remote_failure_is_error_result() {
        let registry = ToolRegistry::new(MockSearchConsole::failing(403, "User does not have sufficient permission"));
        let response = registry
            .call_tool("list_sitemaps", json!({"siteUrl": "https://example.com/"}))
            .await
            .unwrap();

        assert!(response.is_error);
        let body: Value = serde_json::from_str(&response.content[0].text).unwrap();
        assert_eq!(body["error"]["code"], -32000);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("User does not have sufficient permission"));
    }
}

//! Search analytics tools: the general query plus the top-N narrowings.

use gsc_core::google::{metric, SearchAnalyticsQuery, SearchAnalyticsRow, SearchConsole};
use gsc_core::GscResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{decode, format_ctr, format_position, to_output, SITE_URL};
use crate::schema::{Args, Field, FieldKind};

const DIMENSION: FieldKind = FieldKind::Enum {
    values: &["query", "page", "country", "device", "searchAppearance"],
    default: None,
};

const OPERATOR: FieldKind = FieldKind::Enum {
    values: &[
        "equals",
        "notEquals",
        "contains",
        "notContains",
        "includingRegex",
        "excludingRegex",
    ],
    default: None,
};

const FILTER_FIELDS: &[Field] = &[
    Field::required("dimension", DIMENSION, "Dimension to group results by"),
    Field::required("operator", OPERATOR, "Filter operator"),
    Field::required("expression", FieldKind::String, "Filter value"),
];

const FILTER: FieldKind = FieldKind::Object(FILTER_FIELDS);

const FILTER_GROUP_FIELDS: &[Field] = &[
    Field::optional(
        "groupType",
        FieldKind::Enum {
            values: &["and"],
            default: Some("and"),
        },
        "How filters in the group combine",
    ),
    Field::optional("filters", FieldKind::Array(&FILTER), "Filters in this group"),
];

const FILTER_GROUP: FieldKind = FieldKind::Object(FILTER_GROUP_FIELDS);

const START_DATE: Field = Field::required("startDate", FieldKind::Date, "Start date for the query period");
const END_DATE: Field = Field::required("endDate", FieldKind::Date, "End date for the query period");

pub const QUERY_FIELDS: &[Field] = &[
    SITE_URL,
    START_DATE,
    END_DATE,
    Field::optional(
        "dimensions",
        FieldKind::Array(&DIMENSION),
        "Array of dimensions to group results by",
    ),
    Field::optional(
        "dimensionFilterGroups",
        FieldKind::Array(&FILTER_GROUP),
        "Filters to apply to the query",
    ),
    Field::optional(
        "rowLimit",
        FieldKind::Integer {
            min: 1,
            max: Some(25000),
            default: Some(1000),
        },
        "Maximum number of rows to return (1-25000)",
    ),
    Field::optional(
        "startRow",
        FieldKind::Integer {
            min: 0,
            max: Some(u32::MAX as i64),
            default: Some(0),
        },
        "Zero-based index of the first row to return",
    ),
    Field::optional(
        "dataState",
        FieldKind::Enum {
            values: &["all", "final"],
            default: Some("all"),
        },
        "Data state: all includes fresh data, final only verified data",
    ),
];

const TOP_LIMIT: FieldKind = FieldKind::Integer {
    min: 1,
    max: Some(25000),
    default: Some(25),
};

pub const TOP_QUERIES_FIELDS: &[Field] = &[
    SITE_URL,
    Field::required("startDate", FieldKind::Date, "Date in YYYY-MM-DD format"),
    Field::required("endDate", FieldKind::Date, "Date in YYYY-MM-DD format"),
    Field::optional("limit", TOP_LIMIT, "Number of top queries to return"),
];

pub const TOP_PAGES_FIELDS: &[Field] = &[
    SITE_URL,
    Field::required("startDate", FieldKind::Date, "Date in YYYY-MM-DD format"),
    Field::required("endDate", FieldKind::Date, "Date in YYYY-MM-DD format"),
    Field::optional("limit", TOP_LIMIT, "Number of top pages to return"),
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopArgs {
    site_url: String,
    start_date: String,
    end_date: String,
    limit: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryOutput {
    rows: Vec<SearchAnalyticsRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_aggregation_type: Option<String>,
}

/// One ranked entry. Serialized under `query` or `page` by the caller.
#[derive(Debug, Serialize)]
struct RankedRow {
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "metric")]
    clicks: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "metric")]
    impressions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ctr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<String>,
}

#[derive(Debug, Serialize)]
struct TopQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(flatten)]
    metrics: RankedRow,
}

#[derive(Debug, Serialize)]
struct TopPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<String>,
    #[serde(flatten)]
    metrics: RankedRow,
}

#[derive(Debug, Serialize)]
struct TopQueriesOutput {
    queries: Vec<TopQuery>,
}

#[derive(Debug, Serialize)]
struct TopPagesOutput {
    pages: Vec<TopPage>,
}

/// Split a row into its first key and formatted metrics.
fn rank(row: SearchAnalyticsRow) -> (Option<String>, RankedRow) {
    let key = row.keys.into_iter().next();
    let metrics = RankedRow {
        clicks: row.clicks,
        impressions: row.impressions,
        ctr: row.ctr.map(format_ctr),
        position: row.position.map(format_position),
    };
    (key, metrics)
}

pub async fn query_search_analytics<S: SearchConsole>(api: &S, args: Args) -> GscResult<Value> {
    let query: SearchAnalyticsQuery = decode(args)?;
    let response = api.query_search_analytics(&query).await?;
    debug!("query_search_analytics returned {} rows", response.rows.len());

    to_output(&QueryOutput {
        rows: response.rows,
        response_aggregation_type: response.response_aggregation_type,
    })
}

pub async fn get_top_queries<S: SearchConsole>(api: &S, args: Args) -> GscResult<Value> {
    let args: TopArgs = decode(args)?;
    let rows = api
        .get_top_queries(&args.site_url, &args.start_date, &args.end_date, args.limit)
        .await?;

    let queries = rows
        .into_iter()
        .map(rank)
        .map(|(query, metrics)| TopQuery { query, metrics })
        .collect();
    to_output(&TopQueriesOutput { queries })
}

pub async fn get_top_pages<S: SearchConsole>(api: &S, args: Args) -> GscResult<Value> {
    let args: TopArgs = decode(args)?;
    let rows = api
        .get_top_pages(&args.site_url, &args.start_date, &args.end_date, args.limit)
        .await?;

    let pages = rows
        .into_iter()
        .map(rank)
        .map(|(page, metrics)| TopPage { page, metrics })
        .collect();
    to_output(&TopPagesOutput { pages })
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! XML sitemap generation from a cursor-paginated content listing.

use crate::models::sitemap::{
    ContentConnection, ContentNode, ContentType, GraphQlRequest, GraphQlResponse,
    GraphQlVariables, SitemapEntry, SitemapIndexEntry,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use thiserror::Error;
use tracing::{debug, warn};

/// Nodes requested per page.
pub const PAGE_SIZE: usize = 100;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("WordPress GraphQL endpoint not configured")]
    NotConfigured,

    #[error("content request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0} from GraphQL endpoint")]
    Status(u16),

    #[error("malformed GraphQL response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    #[error("GraphQL response has no `{0}` connection")]
    MissingConnection(&'static str),

    #[error("pagination stalled on {0}: hasNextPage without a new endCursor")]
    StalledPagination(ContentType),
}

/// A paginated listing of content nodes.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_page(
        &self,
        content_type: ContentType,
        first: usize,
        after: Option<&str>,
    ) -> Result<ContentConnection, SitemapError>;
}

/// [`ContentSource`] backed by WPGraphQL.
pub struct GraphQlContentSource {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphQlContentSource {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

fn listing_query(content_type: ContentType) -> String {
    let connection = content_type.connection_field();
    format!(
        "query SitemapListing($first: Int!, $after: String) {{
  {connection}(first: $first, after: $after) {{
    nodes {{ uri modifiedGmt }}
    pageInfo {{ hasNextPage endCursor }}
  }}
}}"
    )
}

#[async_trait]
impl ContentSource for GraphQlContentSource {
    async fn fetch_page(
        &self,
        content_type: ContentType,
        first: usize,
        after: Option<&str>,
    ) -> Result<ContentConnection, SitemapError> {
        let query = listing_query(content_type);
        let request = GraphQlRequest {
            query: &query,
            variables: GraphQlVariables { first, after },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: GraphQlResponse = serde_json::from_str(&body)?;

        if let Some(errors) = parsed.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(SitemapError::GraphQl(messages.join("; ")));
        }

        let field = content_type.connection_field();
        parsed
            .data
            .and_then(|mut data| data.remove(field))
            .flatten()
            .ok_or(SitemapError::MissingConnection(field))
    }
}

/// Walk every page of `content_type` until `hasNextPage` is false.
pub async fn collect_nodes(
    source: &dyn ContentSource,
    content_type: ContentType,
) -> Result<Vec<ContentNode>, SitemapError> {
    let mut nodes = Vec::new();
    let mut after: Option<String> = None;

    loop {
        let page = source
            .fetch_page(content_type, PAGE_SIZE, after.as_deref())
            .await?;
        debug!(%content_type, count = page.nodes.len(), "fetched sitemap page");
        nodes.extend(page.nodes);

        if !page.page_info.has_next_page {
            break;
        }

        match page.page_info.end_cursor {
            Some(cursor) if after.as_deref() != Some(cursor.as_str()) => after = Some(cursor),
            _ => return Err(SitemapError::StalledPagination(content_type)),
        }
    }

    Ok(nodes)
}

/// Turn nodes into entries under `site_url`, dropping one trailing slash from each path.
///
/// Nodes without a `uri` cannot be placed in a sitemap; the second value counts them.
pub fn entries_from_nodes(nodes: Vec<ContentNode>, site_url: &str) -> (Vec<SitemapEntry>, usize) {
    let total = nodes.len();
    let entries: Vec<SitemapEntry> = nodes
        .into_iter()
        .filter_map(|node| {
            let uri = node.uri?;
            let path = uri.strip_suffix('/').unwrap_or(&uri);
            Some(SitemapEntry {
                loc: format!("{site_url}{path}"),
                lastmod: node.modified_gmt.as_deref().and_then(parse_modified),
            })
        })
        .collect();
    let skipped = total - entries.len();
    (entries, skipped)
}

/// Parse a WordPress GMT timestamp. Values without an offset are UTC.
pub fn parse_modified(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

pub async fn build_sitemap(
    content_type: ContentType,
    source: &dyn ContentSource,
    site_url: &str,
) -> Result<String, SitemapError> {
    let nodes = collect_nodes(source, content_type).await?;
    let (entries, skipped) = entries_from_nodes(nodes, site_url);
    if skipped > 0 {
        warn!(%content_type, skipped, "content nodes without a uri left out of sitemap");
    }
    debug!(%content_type, count = entries.len(), "generating sitemap");
    Ok(render_urlset(&entries))
}

/// Index over the post and page partitions, stamped with `now`.
pub fn build_sitemap_index(site_url: &str, now: DateTime<Utc>) -> String {
    let entries: Vec<SitemapIndexEntry> = [ContentType::Posts, ContentType::Pages]
        .iter()
        .map(|content_type| SitemapIndexEntry {
            loc: format!("{site_url}/{}", content_type.sitemap_file()),
            lastmod: now,
        })
        .collect();
    render_sitemap_index(&entries)
}

pub fn render_urlset(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!("<urlset xmlns=\"{SITEMAP_NS}\">\n"));

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", w3c_datetime(lastmod)));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

pub fn render_sitemap_index(entries: &[SitemapIndexEntry]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!("<sitemapindex xmlns=\"{SITEMAP_NS}\">\n"));

    for entry in entries {
        xml.push_str("  <sitemap>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            w3c_datetime(&entry.lastmod)
        ));
        xml.push_str("  </sitemap>\n");
    }

    xml.push_str("</sitemapindex>\n");
    xml
}

fn w3c_datetime(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sitemap partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Posts,
    Pages,
}

impl ContentType {
    /// Name of the WPGraphQL connection field listing this content.
    pub fn connection_field(&self) -> &'static str {
        match self {
            ContentType::Posts => "posts",
            ContentType::Pages => "pages",
        }
    }

    /// File name the partition is served under.
    pub fn sitemap_file(&self) -> &'static str {
        match self {
            ContentType::Posts => "post-sitemap.xml",
            ContentType::Pages => "page-sitemap.xml",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.connection_field())
    }
}

/// One `<url>` in a urlset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
}

/// One `<sitemap>` in a sitemap index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapIndexEntry {
    pub loc: String,
    pub lastmod: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// WPGraphQL wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentNode {
    pub uri: Option<String>,
    #[serde(rename = "modifiedGmt")]
    pub modified_gmt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// One page of a cursor-paginated connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentConnection {
    pub nodes: Vec<ContentNode>,
    pub page_info: PageInfo,
}

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: GraphQlVariables<'a>,
}

#[derive(Debug, Serialize)]
pub struct GraphQlVariables<'a> {
    pub first: usize,
    pub after: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    pub data: Option<HashMap<String, Option<ContentConnection>>>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

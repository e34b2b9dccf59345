// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Front-page `noindex` detection through the Rank Math headless API.
//!
//! The API returns the rendered `<head>` markup, so the robots directive is
//! scraped out of HTML. That is fragile, which is why the evaluator only sees
//! this through [`NoIndexProbe`].

use crate::services::error::FetchError;
use crate::services::http::{cache_busted_url, get_json};
use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::warn;

pub const RANK_MATH_HEAD_PATH: &str = "/wp-json/rankmath/v1/getHead";

/// Source of the page-level `noindex` signal.
#[async_trait]
pub trait NoIndexProbe: Send + Sync {
    /// Whether the backend's front page carries a `noindex` directive.
    /// Implementations must return `false` when they cannot tell.
    async fn probe_no_index(&self, backend_url: &str) -> bool;
}

#[derive(Debug, Deserialize)]
struct HeadResponse {
    head: Option<String>,
}

pub struct RankMathProbe {
    client: reqwest::Client,
}

impl RankMathProbe {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn try_probe(&self, backend_url: &str) -> Result<bool, FetchError> {
        let url = cache_busted_url(
            &format!("{backend_url}{RANK_MATH_HEAD_PATH}"),
            &[("url", backend_url)],
        )?;
        let response: HeadResponse = get_json(&self.client, url).await?;
        let head = response
            .head
            .ok_or_else(|| FetchError::Malformed("response has no `head` field".to_string()))?;
        Ok(has_noindex(&head))
    }
}

#[async_trait]
impl NoIndexProbe for RankMathProbe {
    async fn probe_no_index(&self, backend_url: &str) -> bool {
        match self.try_probe(backend_url).await {
            Ok(no_index) => no_index,
            Err(e) => {
                warn!(backend = backend_url, error = %e, "Rank Math head probe failed");
                false
            }
        }
    }
}

/// Content of the first `<meta name="robots">` tag in `html`.
pub fn robots_meta_content(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(r#"meta[name="robots"]"#) else {
        return None;
    };

    document
        .select(&selector)
        .find_map(|element| element.value().attr("content"))
        .map(str::to_string)
}

/// Whether the robots meta tag in `html` lists the `noindex` token.
pub fn has_noindex(html: &str) -> bool {
    robots_meta_content(html)
        .map(|content| {
            content
                .split(',')
                .any(|token| token.trim().eq_ignore_ascii_case("noindex"))
        })
        .unwrap_or(false)
}

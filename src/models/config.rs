// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Service configuration.
//!
//! Every field can be given as a CLI flag or through its environment variable.
//! The parsed value is built once at startup and handed to each component;
//! nothing below `main` reads the environment.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Default outbound user agent. Some managed WordPress hosts filter unknown
/// agents on the REST API, so this matches what the frontend always sent.
pub const DEFAULT_USER_AGENT: &str = "NextJS-Headless-Site";

#[derive(Debug, Clone, Parser)]
#[command(name = "headless-seo")]
#[command(about = "robots.txt and sitemap service for a headless WordPress site")]
pub struct SiteConfig {
    /// Base URL of the WordPress backend
    #[arg(long, env = "WORDPRESS_URL")]
    pub wordpress_url: Option<String>,

    /// Public base URL of the frontend site
    #[arg(long, env = "SITE_URL", default_value = "http://localhost:3000")]
    pub site_url: String,

    /// Serve an indexable robots.txt regardless of what WordPress reports
    #[arg(long, env = "FORCE_ALLOW_INDEXING")]
    pub force_allow_indexing: bool,

    /// WPGraphQL endpoint; defaults to `{wordpress_url}/graphql`
    #[arg(long, env = "WORDPRESS_GRAPHQL_URL")]
    pub graphql_url: Option<String>,

    /// Timeout for every outbound request, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 5)]
    pub fetch_timeout_secs: u64,

    /// How long gathered indexing signals are reused, in seconds (0 disables)
    #[arg(long, env = "SIGNAL_CACHE_TTL_SECS", default_value_t = 60)]
    pub signal_cache_ttl_secs: u64,

    /// User agent sent to the backend
    #[arg(long, env = "USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,
}

impl SiteConfig {
    /// Minimal configuration for a backend/site pair, everything else at its default.
    pub fn new(wordpress_url: Option<&str>, site_url: &str) -> Self {
        Self {
            wordpress_url: wordpress_url.map(str::to_string),
            site_url: site_url.to_string(),
            force_allow_indexing: false,
            graphql_url: None,
            fetch_timeout_secs: 5,
            signal_cache_ttl_secs: 60,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }

    /// Normalised backend base URL, or `None` when unset or unparsable.
    pub fn backend_url(&self) -> Option<String> {
        self.wordpress_url.as_deref().and_then(normalize_base_url)
    }

    /// Normalised public site URL, without a trailing slash.
    pub fn public_site_url(&self) -> String {
        normalize_base_url(&self.site_url)
            .unwrap_or_else(|| self.site_url.trim().trim_end_matches('/').to_string())
    }

    /// GraphQL endpoint used as the sitemap content source.
    pub fn graphql_endpoint(&self) -> Option<String> {
        match self.graphql_url.as_deref().and_then(normalize_base_url) {
            Some(url) => Some(url),
            None => self.backend_url().map(|base| format!("{base}/graphql")),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn signal_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.signal_cache_ttl_secs)
    }
}

/// Trim whitespace and trailing slashes; accept only absolute http(s) URLs with a host.
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    let parsed = url::Url::parse(trimmed).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return None;
    }

    Some(trimmed.to_string())
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, Utc};

/// Body served whenever indexing is blocked. Carries no `Sitemap:` line.
pub const BLOCKED_ROBOTS: &str = "User-agent: *\nDisallow: /";

/// Browser TTL for allowed robots.txt responses, in seconds.
pub const ALLOWED_MAX_AGE: u64 = 300;
/// CDN TTL for allowed robots.txt responses, in seconds.
pub const ALLOWED_S_MAXAGE: u64 = 60;

/// Why a blocked document is being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// The indexing policy decided to block.
    Policy,
    /// Something failed before a decision could be made.
    Emergency,
}

/// The robots.txt body to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsDocument {
    Blocked(BlockReason),
    /// Backend robots.txt with backend URLs rewritten to the public site.
    AllowedFromUpstream(String),
    /// Static ruleset with an explicit sitemap reference.
    AllowedFallback(String),
}

/// HTTP caching behaviour attached to a [`RobotsDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    NoStore { private: bool },
    Public { max_age: u64, s_maxage: u64 },
}

impl CachePolicy {
    pub fn cache_control(&self) -> String {
        match self {
            CachePolicy::NoStore { private: true } => {
                "no-cache, no-store, must-revalidate, max-age=0, private".to_string()
            }
            CachePolicy::NoStore { private: false } => {
                "no-cache, no-store, must-revalidate, max-age=0".to_string()
            }
            CachePolicy::Public { max_age, s_maxage } => {
                format!("public, max-age={max_age}, s-maxage={s_maxage}")
            }
        }
    }

    pub fn is_no_store(&self) -> bool {
        matches!(self, CachePolicy::NoStore { .. })
    }
}

impl RobotsDocument {
    pub fn emergency() -> Self {
        RobotsDocument::Blocked(BlockReason::Emergency)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, RobotsDocument::Blocked(_))
    }

    pub fn body(&self) -> &str {
        match self {
            RobotsDocument::Blocked(_) => BLOCKED_ROBOTS,
            RobotsDocument::AllowedFromUpstream(body) | RobotsDocument::AllowedFallback(body) => {
                body
            }
        }
    }

    pub fn into_body(self) -> String {
        match self {
            RobotsDocument::Blocked(_) => BLOCKED_ROBOTS.to_string(),
            RobotsDocument::AllowedFromUpstream(body) | RobotsDocument::AllowedFallback(body) => {
                body
            }
        }
    }

    pub fn cache_policy(&self) -> CachePolicy {
        match self {
            RobotsDocument::Blocked(BlockReason::Policy) => CachePolicy::NoStore { private: true },
            RobotsDocument::Blocked(BlockReason::Emergency) => {
                CachePolicy::NoStore { private: false }
            }
            _ => CachePolicy::Public {
                max_age: ALLOWED_MAX_AGE,
                s_maxage: ALLOWED_S_MAXAGE,
            },
        }
    }

    /// Short label used in ETags and logs.
    pub fn variant(&self) -> &'static str {
        match self {
            RobotsDocument::Blocked(BlockReason::Policy) => "blocked",
            RobotsDocument::Blocked(BlockReason::Emergency) => "emergency",
            RobotsDocument::AllowedFromUpstream(_) => "allowed",
            RobotsDocument::AllowedFallback(_) => "fallback-allowed",
        }
    }

    /// Response headers for this document, stamped with `now`.
    ///
    /// Header names are lowercase so they can be turned into `HeaderName`s
    /// without validation.
    pub fn response_headers(&self, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let policy = self.cache_policy();
        let mut headers = vec![
            ("content-type", "text/plain; charset=utf-8".to_string()),
            ("cache-control", policy.cache_control()),
        ];

        if policy.is_no_store() {
            headers.push(("pragma", "no-cache".to_string()));
            headers.push(("expires", "0".to_string()));
        }

        headers.push(("last-modified", http_date(now)));
        headers.push((
            "etag",
            format!("\"{}-{}\"", self.variant(), now.timestamp_millis()),
        ));

        if !matches!(self, RobotsDocument::Blocked(BlockReason::Emergency)) {
            headers.push(("vary", "User-Agent, Accept-Encoding".to_string()));
        }

        headers
    }
}

/// Format a timestamp as an RFC 7231 HTTP date.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

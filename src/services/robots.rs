// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Builds the robots.txt served on the public site.

use crate::models::config::SiteConfig;
use crate::models::robots::{BlockReason, RobotsDocument};
use crate::models::signal::IndexingDecision;
use crate::services::policy::evaluate;
use crate::services::signals::SignalGatherer;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RobotsError {
    #[error("WordPress URL not configured")]
    MissingBackend,

    #[error("WordPress backend unreachable at {0}")]
    BackendUnreachable(String),
}

/// Allow-all ruleset used when the backend has no robots.txt of its own.
pub fn fallback_robots(site_url: &str) -> String {
    format!(
        "User-agent: *
Allow: /

# Block WordPress backend paths
Disallow: /wp-admin/
Allow: /wp-admin/admin-ajax.php
Disallow: /wp-includes/
Disallow: /wp-content/plugins/
Disallow: /wp-content/themes/
Disallow: /wp-login.php
Disallow: /xmlrpc.php

# Block search and feed URLs
Disallow: /search/
Disallow: /?s=
Disallow: */feed/
Disallow: */trackback/
Disallow: /?replytocom=

# Sitemap
Sitemap: {site_url}/sitemap.xml"
    )
}

/// Pick the document for `decision`.
///
/// A blocked document never points at the sitemap; an allowed one always does,
/// so an upstream body without a `Sitemap:` line gets one appended.
pub fn build(
    decision: IndexingDecision,
    upstream_body: Option<String>,
    site_url: &str,
) -> RobotsDocument {
    if decision.is_blocked() {
        return RobotsDocument::Blocked(BlockReason::Policy);
    }

    match upstream_body {
        Some(body) if !body.trim().is_empty() => {
            RobotsDocument::AllowedFromUpstream(ensure_sitemap_line(body, site_url))
        }
        _ => RobotsDocument::AllowedFallback(fallback_robots(site_url)),
    }
}

fn ensure_sitemap_line(mut body: String, site_url: &str) -> String {
    let has_sitemap = body.lines().any(|line| {
        line.trim_start()
            .get(..8)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("sitemap:"))
    });
    if has_sitemap {
        return body;
    }

    if !body.ends_with('\n') {
        body.push('\n');
    }
    body.push_str(&format!("Sitemap: {site_url}/sitemap.xml\n"));
    body
}

/// Gather signals, decide, and build. Errors mean no decision could be made;
/// callers answer those with [`RobotsDocument::emergency`].
///
/// Individual signals fail open, but a backend that cannot be reached at all
/// yields no information, so that fails closed unless indexing is forced.
pub async fn generate_robots(
    config: &SiteConfig,
    gatherer: &SignalGatherer,
) -> Result<RobotsDocument, RobotsError> {
    let backend_url = config.backend_url().ok_or(RobotsError::MissingBackend)?;
    let site_url = config.public_site_url();

    let gathered = gatherer.gather(&backend_url, &site_url).await;
    if !gathered.backend_reachable && !config.force_allow_indexing {
        return Err(RobotsError::BackendUnreachable(backend_url));
    }

    let signal = gathered.to_signal(config.force_allow_indexing);
    let decision = evaluate(&signal);

    let document = build(decision, gathered.upstream.body, &site_url);
    info!(
        site_public = signal.site_public,
        upstream_disallow_all = signal.upstream_disallow_all,
        no_index = signal.no_index_directive,
        force_allow = signal.force_allow,
        variant = document.variant(),
        "serving robots.txt"
    );
    Ok(document)
}

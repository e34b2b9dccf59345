// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Cache-bust diagnostics: compares what WordPress reports with what the public
//! site is actually serving, bypassing every cache on the way.

use crate::models::diagnostics::{
    Analysis, CacheBustReport, CacheBustResults, Check, FrontendRobotsSnapshot, Instructions,
    RobotsSnapshot, SettingsSnapshot,
};
use crate::services::error::FetchError;
use crate::services::http::{cache_busted_url, get_no_cache};
use crate::services::settings::{blog_public_flag, try_fetch_settings};
use crate::services::upstream_robots::{has_disallow_all, try_fetch_robots, GENERIC_AGENT};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use texting_robots::{get_robots_url, Robot};
use tracing::warn;

/// Run all three checks and analyse them. The caller is responsible for
/// dropping any cached signals first.
pub async fn run_cache_bust(
    client: &reqwest::Client,
    backend_url: &str,
    site_url: &str,
) -> CacheBustReport {
    let started = Utc::now();

    let (settings, backend_robots, frontend_robots) = tokio::join!(
        check_settings(client, backend_url),
        check_backend_robots(client, backend_url),
        check_frontend_robots(client, site_url),
    );

    let results = CacheBustResults {
        wordpress_settings: settings,
        wordpress_robots: backend_robots,
        frontend_robots,
    };
    let analysis = analyze(&results, started);

    CacheBustReport {
        results,
        analysis,
        instructions: Instructions::default(),
    }
}

async fn check_settings(client: &reqwest::Client, backend_url: &str) -> Check<SettingsSnapshot> {
    match try_fetch_settings(client, backend_url).await {
        Ok(settings) => Check::Ok(SettingsSnapshot {
            blog_public: settings
                .blog_public
                .clone()
                .unwrap_or(serde_json::Value::Null),
            url: settings.url,
            timestamp: Utc::now(),
        }),
        Err(e) => failed("settings", e),
    }
}

async fn check_backend_robots(
    client: &reqwest::Client,
    backend_url: &str,
) -> Check<RobotsSnapshot> {
    match try_fetch_robots(client, backend_url).await {
        Ok(content) => Check::Ok(RobotsSnapshot {
            has_disallow_all: has_disallow_all(&content),
            content,
            timestamp: Utc::now(),
        }),
        Err(e) => failed("backend robots.txt", e),
    }
}

async fn check_frontend_robots(
    client: &reqwest::Client,
    site_url: &str,
) -> Check<FrontendRobotsSnapshot> {
    match fetch_frontend_robots(client, site_url).await {
        Ok(snapshot) => Check::Ok(snapshot),
        Err(e) => failed("frontend robots.txt", e),
    }
}

async fn fetch_frontend_robots(
    client: &reqwest::Client,
    site_url: &str,
) -> Result<FrontendRobotsSnapshot, FetchError> {
    let robots_url = get_robots_url(site_url).map_err(|e| FetchError::Malformed(e.to_string()))?;
    let response = get_no_cache(client, cache_busted_url(&robots_url, &[])?).await?;

    let headers: BTreeMap<String, String> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let content = response.text().await?;

    Ok(FrontendRobotsSnapshot {
        has_disallow_all: has_disallow_all(&content),
        allows_root: allows_site_root(&content, site_url),
        content,
        headers,
        timestamp: Utc::now(),
    })
}

fn failed<T>(what: &str, e: FetchError) -> Check<T> {
    warn!(check = what, error = %e, "cache-bust check failed");
    Check::Failed {
        error: e.to_string(),
    }
}

/// Whether a crawler with no group of its own may fetch the site root under `robots_txt`.
pub fn allows_site_root(robots_txt: &str, site_url: &str) -> bool {
    match Robot::new(GENERIC_AGENT, robots_txt.as_bytes()) {
        Ok(robot) => robot.allowed(&format!("{site_url}/")),
        Err(_) => !has_disallow_all(robots_txt),
    }
}

/// Compare the backend's visibility with what the frontend serves.
pub fn analyze(results: &CacheBustResults, started: DateTime<Utc>) -> Analysis {
    let wordpress_is_public = results
        .wordpress_settings
        .ok()
        .map(|settings| blog_public_flag(Some(&settings.blog_public)));
    let frontend_allows_all = results.frontend_robots.ok().map(|robots| robots.allows_root);

    let mut recommendations = Vec::new();
    let is_consistent = match (wordpress_is_public, frontend_allows_all) {
        (Some(wp_public), Some(frontend_allows)) => {
            if wp_public && !frontend_allows {
                recommendations.push(
                    "WordPress allows indexing but frontend blocks it - check cache".to_string(),
                );
            } else if !wp_public && frontend_allows {
                recommendations.push(
                    "WordPress blocks indexing but frontend allows it - check cache".to_string(),
                );
            }
            wp_public == frontend_allows
        }
        _ => false,
    };

    Analysis {
        timestamp: Utc::now(),
        cache_buster_used: started.timestamp_millis(),
        is_consistent,
        wordpress_is_public,
        frontend_allows_all,
        recommendations,
    }
}

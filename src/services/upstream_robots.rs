// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Fetches the backend's own robots.txt and makes it usable on the public site.

use crate::services::error::FetchError;
use crate::services::http::{cache_busted_url, get_text};
use texting_robots::Robot;
use tracing::{debug, warn};

/// What the backend's robots.txt contributed to this request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamRobots {
    /// Body with backend URLs rewritten, `None` when it could not be fetched.
    pub body: Option<String>,
    pub disallow_all: bool,
}

pub async fn try_fetch_robots(
    client: &reqwest::Client,
    backend_url: &str,
) -> Result<String, FetchError> {
    let url = cache_busted_url(&format!("{backend_url}/robots.txt"), &[])?;
    get_text(client, url).await
}

/// Fetch and rewrite the backend robots.txt. Fails open: on any error the body
/// is `None` and `disallow_all` is `false`.
pub async fn fetch_upstream_robots(
    client: &reqwest::Client,
    backend_url: &str,
    site_url: &str,
) -> UpstreamRobots {
    upstream_or_default(try_fetch_robots(client, backend_url).await, backend_url, site_url)
}

/// Turn a robots fetch outcome into [`UpstreamRobots`], logging failures.
pub fn upstream_or_default(
    result: Result<String, FetchError>,
    backend_url: &str,
    site_url: &str,
) -> UpstreamRobots {
    match result {
        Ok(body) => UpstreamRobots {
            disallow_all: has_disallow_all(&body),
            body: Some(rewrite_origin(&body, backend_url, site_url)),
        },
        Err(e) => {
            warn!(backend = backend_url, error = %e, "backend robots.txt fetch failed");
            UpstreamRobots::default()
        }
    }
}

/// Agent name used to read the generic group. No robots.txt names it, so only
/// `User-agent: *` rules apply to it.
pub const GENERIC_AGENT: &str = "headless-seo";

/// True iff the rules for a generic crawler disallow the site root.
///
/// Groups scoped to named agents (`User-agent: GPTBot` / `Disallow: /`) and
/// path exclusions such as `Disallow: /wp-admin/` do not count.
pub fn has_disallow_all(body: &str) -> bool {
    match Robot::new(GENERIC_AGENT, body.as_bytes()) {
        Ok(robot) => !robot.allowed("/"),
        Err(e) => {
            debug!(error = %e, "robots.txt did not parse, checking lines");
            has_disallow_all_line(body)
        }
    }
}

/// Line-based fallback: some `Disallow` of `/` or `/*`, in any group.
fn has_disallow_all_line(body: &str) -> bool {
    body.lines().any(|line| {
        let line = line.split('#').next().unwrap_or_default().trim();
        let Some((directive, value)) = line.split_once(':') else {
            return false;
        };
        directive.trim().eq_ignore_ascii_case("disallow") && matches!(value.trim(), "/" | "/*")
    })
}

/// Replace every occurrence of the backend origin (either scheme) with the site origin.
pub fn rewrite_origin(body: &str, backend_url: &str, site_url: &str) -> String {
    let backend = backend_url.trim_end_matches('/');
    let site = site_url.trim_end_matches('/');
    if backend.is_empty() || backend == site {
        return body.to_string();
    }

    let mut rewritten = body.replace(backend, site);
    if let Some(other) = other_scheme(backend) {
        rewritten = rewritten.replace(&other, site);
    }
    rewritten
}

fn other_scheme(url: &str) -> Option<String> {
    if let Some(rest) = url.strip_prefix("https://") {
        Some(format!("http://{rest}"))
    } else {
        url.strip_prefix("http://")
            .map(|rest| format!("https://{rest}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wp_admin_only_is_not_disallow_all() {
        let body = "User-agent: *\nDisallow: /wp-admin/\nAllow: /wp-admin/admin-ajax.php\n";
        assert!(!has_disallow_all(body));
    }

    #[test]
    fn test_bare_disallow_root_is_disallow_all() {
        assert!(has_disallow_all("User-agent: *\nDisallow: /\n"));
    }

    #[test]
    fn test_disallow_all_with_spacing_and_case() {
        assert!(has_disallow_all("user-agent: *\ndisallow:   /   # private\n"));
        assert!(has_disallow_all("User-agent: *\r\nDisallow: /*\r\n"));
    }

    #[test]
    fn test_disallow_scoped_to_named_agent_is_not_disallow_all() {
        let body = "User-agent: GPTBot\nDisallow: /\n\nUser-agent: CCBot\nDisallow: /\n\nUser-agent: *\nDisallow: /wp-admin/\nAllow: /wp-admin/admin-ajax.php\n";
        assert!(!has_disallow_all(body));
    }

    #[test]
    fn test_generic_group_disallow_root_with_wp_paths() {
        let body = "User-agent: *\nDisallow: /wp-admin/\nDisallow: /\n";
        assert!(has_disallow_all(body));

        let split = "User-agent: *\nDisallow: /wp-admin/\n\nUser-agent: BadBot\nDisallow: /\n";
        assert!(!has_disallow_all(split));
    }

    #[test]
    fn test_line_fallback_ignores_groups() {
        assert!(has_disallow_all_line("User-agent: GPTBot\nDisallow: /\n"));
        assert!(!has_disallow_all_line("User-agent: *\nDisallow: /wp-admin/\n"));
    }

    #[test]
    fn test_path_disallows_are_not_disallow_all() {
        assert!(!has_disallow_all("User-agent: *\nDisallow: /private\nDisallow:\n"));
        assert!(!has_disallow_all("# Disallow: /\nUser-agent: *\nAllow: /\n"));
    }

    #[test]
    fn test_rewrite_origin_replaces_sitemap_and_paths() {
        let body = "User-agent: *\nDisallow: https://backend.example/path\nSitemap: https://backend.example/sitemap.xml\n";
        let out = rewrite_origin(body, "https://backend.example", "https://public.example");

        assert!(out.contains("https://public.example/sitemap.xml"));
        assert!(out.contains("https://public.example/path"));
        assert!(!out.contains("backend.example"));
    }

    #[test]
    fn test_rewrite_origin_handles_other_scheme() {
        let body = "Sitemap: http://backend.example/wp-sitemap.xml";
        let out = rewrite_origin(body, "https://backend.example/", "https://public.example");
        assert_eq!(out, "Sitemap: https://public.example/wp-sitemap.xml");
    }

    #[test]
    fn test_failed_fetch_fails_open() {
        let upstream = upstream_or_default(
            Err(FetchError::Status {
                status: 404,
                url: "https://backend.example/robots.txt".to_string(),
            }),
            "https://backend.example",
            "https://public.example",
        );
        assert_eq!(upstream, UpstreamRobots::default());
        assert!(upstream.body.is_none());
        assert!(!upstream.disallow_all);
    }

    #[test]
    fn test_successful_fetch_is_rewritten() {
        let upstream = upstream_or_default(
            Ok("User-agent: *\nDisallow: /\nSitemap: https://backend.example/sitemap.xml".to_string()),
            "https://backend.example",
            "https://public.example",
        );
        assert!(upstream.disallow_all);
        assert_eq!(
            upstream.body.as_deref(),
            Some("User-agent: *\nDisallow: /\nSitemap: https://public.example/sitemap.xml")
        );
    }

    #[test]
    fn test_rewrite_origin_empty_backend_is_noop() {
        let body = "User-agent: *";
        assert_eq!(rewrite_origin(body, "", "https://public.example"), body);
    }
}

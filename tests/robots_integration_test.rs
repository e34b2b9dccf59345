// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use headless_seo::app::{create_router, AppState};
use headless_seo::models::config::SiteConfig;
use headless_seo::services::noindex::NoIndexProbe;
use headless_seo::services::robots::fallback_robots;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITE: &str = "https://public.example";
const BLOCKED: &str = "User-agent: *\nDisallow: /";

struct RobotsResponse {
    status: StatusCode,
    headers: axum::http::HeaderMap,
    body: String,
}

async fn get_robots(app: Router) -> RobotsResponse {
    let response = app
        .oneshot(Request::builder().uri("/robots.txt").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    RobotsResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

fn state_for(config: SiteConfig) -> AppState {
    AppState::from_config(config).expect("client should build")
}

async fn mount_settings(server: &MockServer, blog_public: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Example",
            "url": server.uri(),
            "blog_public": blog_public,
        })))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_rank_math(server: &MockServer, robots_meta: &str) {
    Mock::given(method("GET"))
        .and(path("/wp-json/rankmath/v1/getHead"))
        .and(query_param("url", server.uri()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "head": format!(r#"<title>Home</title><meta name="robots" content="{robots_meta}"/>"#),
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_public_backend_serves_rewritten_upstream() {
    let server = MockServer::start().await;
    mount_settings(&server, json!("1")).await;
    mount_robots(
        &server,
        &format!(
            "User-agent: *\nDisallow: /wp-admin/\nSitemap: {}/wp-sitemap.xml\n",
            server.uri()
        ),
    )
    .await;
    mount_rank_math(&server, "follow, index").await;

    let state = state_for(SiteConfig::new(Some(&server.uri()), SITE));
    let response = get_robots(create_router(state)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        "User-agent: *\nDisallow: /wp-admin/\nSitemap: https://public.example/wp-sitemap.xml\n"
    );
    assert_eq!(
        response.headers["cache-control"],
        "public, max-age=300, s-maxage=60"
    );
    assert_eq!(response.headers["content-type"], "text/plain; charset=utf-8");
    assert!(response.headers["etag"]
        .to_str()
        .unwrap()
        .starts_with("\"allowed-"));
}

#[tokio::test]
async fn test_private_backend_is_blocked_without_caching() {
    let server = MockServer::start().await;
    mount_settings(&server, json!(0)).await;
    mount_robots(&server, "User-agent: *\nAllow: /\n").await;

    let state = state_for(SiteConfig::new(Some(&server.uri()), SITE));
    let response = get_robots(create_router(state)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, BLOCKED);
    assert!(response.headers["cache-control"]
        .to_str()
        .unwrap()
        .starts_with("no-cache, no-store"));
    assert_eq!(response.headers["pragma"], "no-cache");
    assert_eq!(response.headers["expires"], "0");
}

#[tokio::test]
async fn test_upstream_disallow_all_blocks() {
    let server = MockServer::start().await;
    mount_settings(&server, json!("1")).await;
    mount_robots(&server, "User-agent: *\nDisallow: /\n").await;

    let state = state_for(SiteConfig::new(Some(&server.uri()), SITE));
    let response = get_robots(create_router(state)).await;

    assert_eq!(response.body, BLOCKED);
}

#[tokio::test]
async fn test_rank_math_noindex_blocks() {
    let server = MockServer::start().await;
    mount_settings(&server, json!("1")).await;
    mount_robots(&server, "User-agent: *\nDisallow: /wp-admin/\n").await;
    mount_rank_math(&server, "noindex, nofollow").await;

    let state = state_for(SiteConfig::new(Some(&server.uri()), SITE));
    let response = get_robots(create_router(state)).await;

    assert_eq!(response.body, BLOCKED);
}

#[tokio::test]
async fn test_public_site_without_upstream_serves_fallback_verbatim() {
    let server = MockServer::start().await;
    mount_settings(&server, json!("1")).await;
    mount_rank_math(&server, "index, follow").await;

    let state = state_for(SiteConfig::new(Some(&server.uri()), SITE));
    let response = get_robots(create_router(state)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, fallback_robots(SITE));
    assert!(response
        .body
        .contains("Sitemap: https://public.example/sitemap.xml"));
}

#[tokio::test]
async fn test_failing_signals_fail_open_to_fallback() {
    // The backend answers, but every signal endpoint returns 404.
    let server = MockServer::start().await;

    let state = state_for(SiteConfig::new(Some(&server.uri()), SITE));
    let response = get_robots(create_router(state)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.starts_with("User-agent: *\nAllow: /\n"));
    assert!(response
        .body
        .ends_with("Sitemap: https://public.example/sitemap.xml"));
    assert!(response.headers["etag"]
        .to_str()
        .unwrap()
        .starts_with("\"fallback-allowed-"));
}

#[tokio::test]
async fn test_force_allow_overrides_private_backend() {
    let server = MockServer::start().await;
    mount_settings(&server, json!(0)).await;
    mount_robots(&server, "User-agent: *\nDisallow: /\n").await;

    let mut config = SiteConfig::new(Some(&server.uri()), SITE);
    config.force_allow_indexing = true;
    let response = get_robots(create_router(state_for(config))).await;

    assert_ne!(response.body, BLOCKED);
    assert!(response.body.contains("Sitemap: https://public.example/sitemap.xml"));
}

#[tokio::test]
async fn test_missing_backend_serves_emergency() {
    let state = state_for(SiteConfig::new(None, SITE));
    let response = get_robots(create_router(state)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, BLOCKED);
    assert_eq!(
        response.headers["cache-control"],
        "no-cache, no-store, must-revalidate, max-age=0"
    );
    assert!(response.headers["etag"]
        .to_str()
        .unwrap()
        .starts_with("\"emergency-"));
}

#[tokio::test]
async fn test_unreachable_backend_serves_emergency() {
    // Port 9 (discard) is not expected to be serving HTTP.
    let state = state_for(SiteConfig::new(Some("http://127.0.0.1:9"), SITE));
    let response = get_robots(create_router(state)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, BLOCKED);
}

#[tokio::test]
async fn test_unreachable_backend_with_force_allow_is_allowed() {
    let mut config = SiteConfig::new(Some("http://127.0.0.1:9"), SITE);
    config.force_allow_indexing = true;
    let response = get_robots(create_router(state_for(config))).await;

    assert!(response.body.starts_with("User-agent: *\nAllow: /\n"));
}

#[tokio::test]
async fn test_hung_backend_times_out_and_blocks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let mut config = SiteConfig::new(Some(&server.uri()), SITE);
    config.fetch_timeout_secs = 1;
    let response = get_robots(create_router(state_for(config))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, BLOCKED);
}

#[tokio::test]
async fn test_signals_are_cached_until_cache_bust() {
    let server = MockServer::start().await;
    mount_settings(&server, json!("1")).await;
    mount_robots(&server, "User-agent: *\nDisallow: /wp-admin/\n").await;

    // The public site itself is unreachable; the cache-bust report records that.
    let state = state_for(SiteConfig::new(Some(&server.uri()), "http://127.0.0.1:9"));
    let first = get_robots(create_router(state.clone())).await;
    assert_ne!(first.body, BLOCKED);

    server.reset().await;
    mount_settings(&server, json!("0")).await;

    let cached = get_robots(create_router(state.clone())).await;
    assert_eq!(cached.body, first.body);

    let bust = create_router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/cache-bust")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(bust.status(), StatusCode::OK);

    let fresh = get_robots(create_router(state)).await;
    assert_eq!(fresh.body, BLOCKED);
}

struct CountingProbe {
    calls: AtomicUsize,
    no_index: bool,
}

#[async_trait::async_trait]
impl NoIndexProbe for CountingProbe {
    async fn probe_no_index(&self, _backend_url: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.no_index
    }
}

#[tokio::test]
async fn test_custom_probe_is_consulted() {
    let server = MockServer::start().await;
    mount_settings(&server, json!("1")).await;

    let probe = Arc::new(CountingProbe {
        calls: AtomicUsize::new(0),
        no_index: true,
    });
    let state = state_for(SiteConfig::new(Some(&server.uri()), SITE))
        .with_noindex_probe(probe.clone());

    let response = get_robots(create_router(state.clone())).await;
    assert_eq!(response.body, BLOCKED);

    get_robots(create_router(state)).await;
    assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
}

struct PanickingProbe;

#[async_trait::async_trait]
impl NoIndexProbe for PanickingProbe {
    async fn probe_no_index(&self, _backend_url: &str) -> bool {
        panic!("head markup could not be handled");
    }
}

#[tokio::test]
async fn test_panic_while_gathering_serves_emergency() {
    let server = MockServer::start().await;
    mount_settings(&server, json!("1")).await;
    mount_robots(&server, "User-agent: *\nDisallow: /wp-admin/\n").await;

    let state = state_for(SiteConfig::new(Some(&server.uri()), SITE))
        .with_noindex_probe(Arc::new(PanickingProbe));
    let response = get_robots(create_router(state)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, BLOCKED);
    assert_eq!(
        response.headers["cache-control"],
        "no-cache, no-store, must-revalidate, max-age=0"
    );
    assert!(response.headers["etag"]
        .to_str()
        .unwrap()
        .starts_with("\"emergency-"));
}

#[tokio::test]
async fn test_crawler_specific_block_keeps_site_indexable() {
    let server = MockServer::start().await;
    mount_settings(&server, json!("1")).await;
    let upstream = "User-agent: GPTBot\nDisallow: /\n\nUser-agent: *\nDisallow: /wp-admin/\nAllow: /wp-admin/admin-ajax.php\n";
    mount_robots(&server, upstream).await;

    let state = state_for(SiteConfig::new(Some(&server.uri()), SITE));
    let response = get_robots(create_router(state)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.starts_with(upstream));
    assert!(response
        .body
        .contains("Sitemap: https://public.example/sitemap.xml"));
    assert_eq!(
        response.headers["cache-control"],
        "public, max-age=300, s-maxage=60"
    );
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Route handlers for the HTTP API.

pub mod diagnostics;
pub mod robots;
pub mod sitemap;

use crate::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

/// Routes for robots.txt, the sitemaps and the cache-bust diagnostic.
pub fn seo_router() -> Router<AppState> {
    Router::new()
        .route(
            "/robots.txt",
            get(robots::robots_handler)
                .layer(CatchPanicLayer::custom(robots::emergency_on_panic)),
        )
        .route("/sitemap.xml", get(sitemap::sitemap_index_handler))
        .route("/sitemap_index.xml", get(sitemap::sitemap_index_handler))
        .route("/post-sitemap.xml", get(sitemap::post_sitemap_handler))
        .route("/page-sitemap.xml", get(sitemap::page_sitemap_handler))
        .route(
            "/api/cache-bust",
            post(diagnostics::cache_bust_handler).fallback(diagnostics::method_not_allowed),
        )
}

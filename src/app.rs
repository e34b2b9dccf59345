// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, the version handler, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::config::SiteConfig;
use crate::models::version::VersionResponse;
use crate::routes::seo_router;
use crate::services::http::build_client;
use crate::services::noindex::{NoIndexProbe, RankMathProbe};
use crate::services::signals::SignalGatherer;
use crate::services::sitemap::{ContentSource, GraphQlContentSource};
use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `HEADLESS_SEO_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("HEADLESS_SEO_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    /// Outbound client shared by every fetcher; carries the request timeout.
    pub http: reqwest::Client,
    pub signals: Arc<SignalGatherer>,
    /// `None` when no backend is configured; sitemap requests then fail with 500.
    pub content_source: Option<Arc<dyn ContentSource>>,
}

impl AppState {
    /// Wire up the production components for `config`.
    pub fn from_config(config: SiteConfig) -> reqwest::Result<Self> {
        let http = build_client(&config)?;
        let probe: Arc<dyn NoIndexProbe> = Arc::new(RankMathProbe::new(http.clone()));
        let signals = Arc::new(SignalGatherer::new(
            http.clone(),
            probe,
            config.signal_cache_ttl(),
        ));
        let content_source = config.graphql_endpoint().map(|endpoint| {
            Arc::new(GraphQlContentSource::new(http.clone(), endpoint)) as Arc<dyn ContentSource>
        });

        Ok(Self {
            config: Arc::new(config),
            http,
            signals,
            content_source,
        })
    }

    /// Replace the sitemap content source.
    pub fn with_content_source(mut self, source: Arc<dyn ContentSource>) -> Self {
        self.content_source = Some(source);
        self
    }

    /// Replace the noindex probe. Starts from an empty signal cache.
    pub fn with_noindex_probe(mut self, probe: Arc<dyn NoIndexProbe>) -> Self {
        self.signals = Arc::new(SignalGatherer::new(
            self.http.clone(),
            probe,
            self.config.signal_cache_ttl(),
        ));
        self
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "headless-seo".to_string(),
        version: VERSION.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the Axum application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .merge(seo_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

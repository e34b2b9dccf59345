// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use clap::Parser;
use headless_seo::app::{create_router, AppState, VERSION};
use headless_seo::models::config::SiteConfig;
use headless_seo::services::logging::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = SiteConfig::parse();
    let bind = config.bind;

    match config.backend_url() {
        Some(backend) => info!(%backend, site = %config.public_site_url(), "using WordPress backend"),
        None => warn!("WORDPRESS_URL is missing or invalid; robots.txt will block all crawlers"),
    }
    if config.force_allow_indexing {
        warn!("FORCE_ALLOW_INDEXING is set; WordPress visibility settings are ignored");
    }

    let state = AppState::from_config(config).context("failed to build HTTP client")?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    info!("headless-seo v{} listening on {}", VERSION, bind);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

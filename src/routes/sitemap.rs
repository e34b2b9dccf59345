// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::app::AppState;
use crate::models::error::ErrorResponse;
use crate::models::sitemap::ContentType;
use crate::services::sitemap::{build_sitemap, build_sitemap_index, SitemapError};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::error;

const SITEMAP_CACHE_CONTROL: &str = "public, max-age=3600";

type SitemapResult = Result<Response, (StatusCode, Json<ErrorResponse>)>;

fn xml_response(xml: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/xml"),
            (header::CACHE_CONTROL, SITEMAP_CACHE_CONTROL),
        ],
        xml,
    )
        .into_response()
}

/// `GET /sitemap.xml` and `GET /sitemap_index.xml`.
pub async fn sitemap_index_handler(State(state): State<AppState>) -> Response {
    xml_response(build_sitemap_index(
        &state.config.public_site_url(),
        Utc::now(),
    ))
}

/// `GET /post-sitemap.xml`.
pub async fn post_sitemap_handler(State(state): State<AppState>) -> SitemapResult {
    content_sitemap(&state, ContentType::Posts).await
}

/// `GET /page-sitemap.xml`.
pub async fn page_sitemap_handler(State(state): State<AppState>) -> SitemapResult {
    content_sitemap(&state, ContentType::Pages).await
}

async fn content_sitemap(state: &AppState, content_type: ContentType) -> SitemapResult {
    let result = match &state.content_source {
        Some(source) => {
            build_sitemap(content_type, source.as_ref(), &state.config.public_site_url()).await
        }
        None => Err(SitemapError::NotConfigured),
    };

    result.map(xml_response).map_err(|e| {
        error!(%content_type, error = %e, "sitemap generation failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
    })
}

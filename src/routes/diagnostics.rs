// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::app::AppState;
use crate::models::diagnostics::CacheBustReport;
use crate::models::error::ErrorResponse;
use crate::services::diagnostics::run_cache_bust;
use crate::services::http::NO_CACHE;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

/// `POST /api/cache-bust`. Drops cached signals for the backend, then reports
/// whether WordPress and the public robots.txt agree.
pub async fn cache_bust_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let backend_url = state.config.backend_url().ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("WordPress URL not configured")),
        )
    })?;

    state.signals.invalidate(&backend_url).await;
    let report: CacheBustReport =
        run_cache_bust(&state.http, &backend_url, &state.config.public_site_url()).await;

    Ok((
        [
            (header::CACHE_CONTROL, NO_CACHE),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        Json(report),
    ))
}

/// Any other method on `/api/cache-bust`.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
}

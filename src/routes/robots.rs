// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::app::AppState;
use crate::models::robots::RobotsDocument;
use crate::services::robots::generate_robots;
use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::any::Any;
use tracing::error;

/// `GET /robots.txt`. Always answers 200; anything that prevents a decision is
/// answered with the blocked emergency document.
pub async fn robots_handler(State(state): State<AppState>) -> RobotsDocument {
    match generate_robots(&state.config, &state.signals).await {
        Ok(document) => document,
        Err(e) => {
            error!(error = %e, "serving emergency robots.txt");
            RobotsDocument::emergency()
        }
    }
}

/// Panic handler for the robots route.
pub fn emergency_on_panic(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("robots.txt handler panicked, serving emergency robots.txt");
    RobotsDocument::emergency().into_response()
}

impl IntoResponse for RobotsDocument {
    fn into_response(self) -> Response {
        let headers = self.response_headers(Utc::now());
        let mut response = (StatusCode::OK, self.into_body()).into_response();

        for (name, value) in headers {
            if let Ok(value) = HeaderValue::from_str(&value) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(name), value);
            }
        }

        response
    }
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use thiserror::Error;

/// Failure while reading one of the backend's indexing signals.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// The backend could not be reached at all, as opposed to answering badly.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, FetchError::Http(e) if e.is_connect() || e.is_timeout())
    }
}

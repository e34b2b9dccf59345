// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Reads WordPress' public-visibility flag from the REST settings endpoint.

use crate::services::error::FetchError;
use crate::services::http::{cache_busted_url, get_json};
use serde::Deserialize;
use tracing::{debug, warn};

pub const SETTINGS_PATH: &str = "/wp-json/wp/v2/settings";

/// The subset of `/wp/v2/settings` this service reads.
#[derive(Debug, Clone, Deserialize)]
pub struct WordPressSettings {
    pub blog_public: Option<serde_json::Value>,
    pub url: Option<String>,
}

impl WordPressSettings {
    pub fn is_public(&self) -> bool {
        blog_public_flag(self.blog_public.as_ref())
    }
}

/// Interpret `blog_public`. Only an explicit `0`, `"0"` or `false` means private;
/// a missing or unrecognised value never blocks.
pub fn blog_public_flag(value: Option<&serde_json::Value>) -> bool {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_i64() != Some(0),
        Some(serde_json::Value::String(s)) => s.trim() != "0",
        Some(serde_json::Value::Bool(b)) => *b,
        _ => true,
    }
}

pub async fn try_fetch_settings(
    client: &reqwest::Client,
    backend_url: &str,
) -> Result<WordPressSettings, FetchError> {
    let url = cache_busted_url(&format!("{backend_url}{SETTINGS_PATH}"), &[])?;
    get_json(client, url).await
}

/// Whether the backend reports itself as public. Falls back to `true` on any failure.
pub async fn fetch_site_public(client: &reqwest::Client, backend_url: &str) -> bool {
    site_public_or_default(&try_fetch_settings(client, backend_url).await, backend_url)
}

/// Apply the fail-open default to a settings fetch outcome, logging failures.
pub fn site_public_or_default(
    result: &Result<WordPressSettings, FetchError>,
    backend_url: &str,
) -> bool {
    match result {
        Ok(settings) => {
            let public = settings.is_public();
            debug!(blog_public = ?settings.blog_public, public, "read WordPress settings");
            public
        }
        Err(e) => {
            warn!(backend = backend_url, error = %e, "settings fetch failed, assuming public");
            true
        }
    }
}

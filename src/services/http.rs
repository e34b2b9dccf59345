// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Shared outbound HTTP plumbing: the client every component uses and the
//! cache-defeating GET the backend fetchers rely on.

use crate::models::config::SiteConfig;
use crate::services::error::FetchError;
use reqwest::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use serde::de::DeserializeOwned;

pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Build the shared client. The timeout bounds every outbound request so a hung
/// backend cannot hang an inbound one.
pub fn build_client(config: &SiteConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.fetch_timeout())
        .user_agent(config.user_agent.clone())
        .build()
}

/// Append `extra` query pairs plus the `t`/`r` cache busters to `base`.
pub fn cache_busted_url(base: &str, extra: &[(&str, &str)]) -> Result<url::Url, url::ParseError> {
    let mut url = url::Url::parse(base)?;
    let millis = chrono::Utc::now().timestamp_millis().to_string();
    let nonce = rand::random::<u32>().to_string();
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in extra {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("t", &millis);
        pairs.append_pair("r", &nonce);
    }
    Ok(url)
}

/// GET `url` with cache-defeating headers and return the response if it is 2xx.
pub async fn get_no_cache(
    client: &reqwest::Client,
    url: url::Url,
) -> Result<reqwest::Response, FetchError> {
    let response = client
        .get(url.clone())
        .header(CACHE_CONTROL, NO_CACHE)
        .header(PRAGMA, "no-cache")
        .header(EXPIRES, "0")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response)
}

pub async fn get_text(client: &reqwest::Client, url: url::Url) -> Result<String, FetchError> {
    Ok(get_no_cache(client, url).await?.text().await?)
}

pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: url::Url,
) -> Result<T, FetchError> {
    let body = get_text(client, url).await?;
    Ok(serde_json::from_str(&body)?)
}

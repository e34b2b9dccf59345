// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Response body of `POST /api/cache-bust`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one diagnostic fetch: the snapshot, or the error that prevented it.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Check<T> {
    Ok(T),
    Failed { error: String },
}

impl<T> Check<T> {
    pub fn ok(&self) -> Option<&T> {
        match self {
            Check::Ok(value) => Some(value),
            Check::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsSnapshot {
    pub blog_public: serde_json::Value,
    pub url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotsSnapshot {
    pub content: String,
    pub has_disallow_all: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendRobotsSnapshot {
    pub content: String,
    pub has_disallow_all: bool,
    /// Whether a robots.txt matcher lets a generic crawler fetch the site root.
    #[serde(skip)]
    pub allows_root: bool,
    pub headers: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheBustResults {
    pub wordpress_settings: Check<SettingsSnapshot>,
    pub wordpress_robots: Check<RobotsSnapshot>,
    pub frontend_robots: Check<FrontendRobotsSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub timestamp: DateTime<Utc>,
    pub cache_buster_used: i64,
    pub is_consistent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordpress_is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontend_allows_all: Option<bool>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Instructions {
    pub step1: &'static str,
    pub step2: &'static str,
    pub step3: &'static str,
    pub step4: &'static str,
    pub step5: &'static str,
}

impl Default for Instructions {
    fn default() -> Self {
        Self {
            step1: "Go to WordPress Admin → Settings → Reading",
            step2: "Toggle \"Discourage search engines from indexing this site\"",
            step3: "Save changes in WordPress",
            step4: "Wait 60-120 seconds for the host's page cache to clear",
            step5: "Call this endpoint again to verify changes",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheBustReport {
    pub results: CacheBustResults,
    pub analysis: Analysis,
    pub instructions: Instructions,
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Gathers the three backend signals for a request, with a short-lived cache
//! so repeated robots.txt hits do not each cost three backend round-trips.

use crate::models::signal::IndexingSignal;
use crate::services::noindex::NoIndexProbe;
use crate::services::settings::{site_public_or_default, try_fetch_settings};
use crate::services::upstream_robots::{try_fetch_robots, upstream_or_default, UpstreamRobots};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Everything read from the backend for one robots.txt decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatheredSignals {
    /// False when neither the settings endpoint nor robots.txt could be reached.
    pub backend_reachable: bool,
    pub site_public: bool,
    pub upstream: UpstreamRobots,
    pub no_index: bool,
}

impl GatheredSignals {
    /// Combine with the live force-allow flag, which is never cached.
    pub fn to_signal(&self, force_allow: bool) -> IndexingSignal {
        IndexingSignal {
            site_public: self.site_public,
            upstream_disallow_all: self.upstream.disallow_all,
            no_index_directive: self.no_index,
            force_allow,
        }
    }
}

struct CachedSignals {
    fetched_at: Instant,
    signals: GatheredSignals,
}

/// Signals keyed by backend URL, valid for `ttl`. A zero TTL disables caching.
pub struct SignalCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedSignals>>,
}

impl SignalCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub async fn get(&self, backend_url: &str) -> Option<GatheredSignals> {
        if !self.is_enabled() {
            return None;
        }
        let entries = self.entries.read().await;
        entries
            .get(backend_url)
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.signals.clone())
    }

    pub async fn insert(&self, backend_url: &str, signals: GatheredSignals) {
        if !self.is_enabled() {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.retain(|_, cached| cached.fetched_at.elapsed() < self.ttl);
        entries.insert(
            backend_url.to_string(),
            CachedSignals {
                fetched_at: Instant::now(),
                signals,
            },
        );
    }

    pub async fn invalidate(&self, backend_url: &str) {
        self.entries.write().await.remove(backend_url);
    }
}

/// Runs the settings fetcher, upstream robots fetcher and noindex probe.
pub struct SignalGatherer {
    client: reqwest::Client,
    probe: Arc<dyn NoIndexProbe>,
    cache: SignalCache,
}

impl SignalGatherer {
    pub fn new(client: reqwest::Client, probe: Arc<dyn NoIndexProbe>, cache_ttl: Duration) -> Self {
        Self {
            client,
            probe,
            cache: SignalCache::new(cache_ttl),
        }
    }

    /// Read all three signals. Each one fails open on its own; the fetches run
    /// concurrently since none depends on another. Results from an unreachable
    /// backend are not cached.
    pub async fn gather(&self, backend_url: &str, site_url: &str) -> GatheredSignals {
        if let Some(cached) = self.cache.get(backend_url).await {
            debug!(backend = backend_url, "using cached indexing signals");
            return cached;
        }

        let (settings, robots, no_index) = tokio::join!(
            try_fetch_settings(&self.client, backend_url),
            try_fetch_robots(&self.client, backend_url),
            self.probe.probe_no_index(backend_url),
        );

        let backend_reachable = !(settings.as_ref().is_err_and(|e| e.is_unreachable())
            && robots.as_ref().is_err_and(|e| e.is_unreachable()));

        let signals = GatheredSignals {
            backend_reachable,
            site_public: site_public_or_default(&settings, backend_url),
            upstream: upstream_or_default(robots, backend_url, site_url),
            no_index,
        };

        if backend_reachable {
            self.cache.insert(backend_url, signals.clone()).await;
        } else {
            warn!(backend = backend_url, "backend unreachable");
        }
        signals
    }

    pub async fn invalidate(&self, backend_url: &str) {
        self.cache.invalidate(backend_url).await;
    }
}

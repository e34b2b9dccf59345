// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};

/// The four independent inputs to the indexing decision.
///
/// Each data-source field falls back to its safe value when the source cannot be
/// read, see [`IndexingSignal::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingSignal {
    /// WordPress `blog_public` setting ("Discourage search engines" unchecked)
    pub site_public: bool,
    /// The backend's own robots.txt disallows the whole site
    pub upstream_disallow_all: bool,
    /// The SEO plugin renders a `noindex` robots meta tag on the front page
    pub no_index_directive: bool,
    /// Operator override from configuration
    pub force_allow: bool,
}

impl Default for IndexingSignal {
    fn default() -> Self {
        Self {
            site_public: true,
            upstream_disallow_all: false,
            no_index_directive: false,
            force_allow: false,
        }
    }
}

/// Outcome of evaluating an [`IndexingSignal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingDecision {
    pub blocked: bool,
}

impl IndexingDecision {
    pub const ALLOWED: Self = Self { blocked: false };
    pub const BLOCKED: Self = Self { blocked: true };

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }
}

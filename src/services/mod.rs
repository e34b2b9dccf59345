// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod diagnostics;
pub mod error;
pub mod http;
pub mod logging;
pub mod noindex;
pub mod policy;
pub mod robots;
pub mod settings;
pub mod signals;
pub mod sitemap;
pub mod upstream_robots;

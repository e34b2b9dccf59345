// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod robots;
pub mod signal;
pub mod sitemap;
pub mod version;

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! robots.txt and XML sitemap service for a headless WordPress site.

pub mod app;
pub mod models;
pub mod routes;
pub mod services;

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the classification engine.
//!
//! Serves the classify endpoint, an on-demand refresh trigger, liveness,
//! the cached reference CSVs, and optionally Prometheus metrics. Every
//! route shares one [`ClassificationEngine`](rxplan_classifier::ClassificationEngine).

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, build_router, start_server};

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics for rxplan.
//!
//! Uses the metrics-rs facade with the Prometheus exporter. Recording
//! helpers are no-ops until a recorder is installed, so library crates call
//! them unconditionally. Metrics are rendered as Prometheus text by
//! [`PrometheusAdapter::render`], which the gateway exposes on `/metrics`.

pub mod recording;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use rxplan_core::RxplanError;

pub use recording::{record_classification, record_refresh, register_metrics, set_reference_size};

/// Installed Prometheus recorder plus the handle used for rendering.
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Installs the Prometheus recorder globally.
    ///
    /// Only one recorder can be installed per process; a second call fails.
    pub fn new() -> Result<Self, RxplanError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            RxplanError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        recording::register_metrics();

        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rxplan serve` command implementation.
//!
//! Builds the reference store and classification engine, runs one refresh
//! so the first requests see data, then serves the HTTP gateway until
//! SIGINT or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use rxplan_classifier::ClassificationEngine;
use rxplan_config::RxplanConfig;
use rxplan_core::RxplanError;
use rxplan_gateway::{GatewayState, ServerConfig, start_server};
use rxplan_reference::{RefreshReport, Refresher, ReferenceStore};
use tracing::{info, warn};

/// Store, engine and refresher wired from config.
pub struct Pipeline {
    pub engine: Arc<ClassificationEngine>,
    pub refresher: Arc<Refresher>,
}

impl Pipeline {
    pub fn from_config(config: &RxplanConfig) -> Result<Self, RxplanError> {
        let store = Arc::new(ReferenceStore::new());
        let engine = Arc::new(ClassificationEngine::from_config(
            Arc::clone(&store),
            &config.classifier,
        ));
        let refresher = Arc::new(Refresher::from_config(store, &config.reference)?);
        Ok(Self { engine, refresher })
    }
}

/// Runs the `rxplan serve` command.
pub async fn run_serve(config: RxplanConfig) -> Result<(), RxplanError> {
    init_tracing(&config.server.log_level);

    info!("starting rxplan serve");

    let pipeline = Pipeline::from_config(&config)?;

    let report = pipeline.refresher.refresh_all().await;
    log_report(&report);

    let state = GatewayState {
        engine: pipeline.engine,
        refresher: pipeline.refresher,
        prometheus_render: metrics_render(&config),
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        data_dir: PathBuf::from(&config.reference.data_dir),
    };

    start_server(&server_config, state, shutdown_signal()).await?;

    info!("rxplan serve shutdown complete");
    Ok(())
}

fn log_report(report: &RefreshReport) {
    if report.all_failed() {
        warn!("no reference data loaded; classifying on commercial BINs and heuristics only");
    } else {
        let failed = report.sources.iter().filter(|(_, o)| o.is_failure()).count();
        info!(
            loaded = report.sources.len() - failed,
            failed, "initial reference refresh complete"
        );
    }
}

/// Installs the Prometheus recorder when `server.metrics_enabled` is set.
fn metrics_render(config: &RxplanConfig) -> Option<rxplan_gateway::server::MetricsRender> {
    if !config.server.metrics_enabled {
        return None;
    }
    match rxplan_prometheus::PrometheusAdapter::new() {
        Ok(adapter) => {
            let adapter = Arc::new(adapter);
            Some(Arc::new(move || adapter.render()))
        }
        Err(e) => {
            warn!(error = %e, "metrics disabled");
            None
        }
    }
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
        _ = terminate => info!("received SIGTERM, initiating shutdown"),
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rxplan={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_can_be_switched_off_in_config() {
        let config =
            rxplan_config::load_and_validate_str("[server]\nmetrics_enabled = false\n").unwrap();
        assert!(metrics_render(&config).is_none());
    }

    #[tokio::test]
    async fn pipeline_shares_one_store() {
        let config = rxplan_config::load_and_validate_str("").unwrap();
        let pipeline = Pipeline::from_config(&config).unwrap();
        assert!(Arc::ptr_eq(
            pipeline.engine.store(),
            pipeline.refresher.store()
        ));
        assert!(!pipeline.engine.health());
    }
}

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rxplan status` command implementation.
//!
//! Queries a running server's `/health` endpoint and shows whether reference
//! data is loaded. Falls back gracefully when the server is not running.

use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::time::Duration;

use rxplan_config::RxplanConfig;
use rxplan_core::RxplanError;
use serde::{Deserialize, Serialize};

/// Per-source section of the health response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceHealth {
    pub pairs: usize,
    pub bins: usize,
    pub loaded_at: Option<String>,
}

/// Health endpoint response from the gateway.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    initialized: bool,
    #[serde(default)]
    sources: BTreeMap<String, SourceHealth>,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub initialized: bool,
    pub endpoint: String,
    pub sources: BTreeMap<String, SourceHealth>,
}

/// Address to probe; a wildcard bind is reached over loopback.
fn health_url(config: &RxplanConfig) -> String {
    let host = match config.server.host.as_str() {
        "0.0.0.0" | "::" | "[::]" => "127.0.0.1",
        other => other,
    };
    format!("http://{host}:{}/health", config.server.port)
}

/// Run the `rxplan status` command.
pub async fn run_status(config: &RxplanConfig, json: bool, plain: bool) -> Result<(), RxplanError> {
    let url = health_url(config);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| RxplanError::Internal(format!("failed to create HTTP client: {e}")))?;

    let status = match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let health: HealthResponse = resp.json().await.map_err(|e| {
                RxplanError::Internal(format!("failed to parse health response: {e}"))
            })?;
            StatusResponse {
                running: true,
                initialized: health.initialized,
                endpoint: url,
                sources: health.sources,
            }
        }
        _ => StatusResponse {
            running: false,
            initialized: false,
            endpoint: url,
            sources: BTreeMap::new(),
        },
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&status).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&status, use_color);
    }

    Ok(())
}

fn print_status(status: &StatusResponse, use_color: bool) {
    use colored::Colorize;

    println!();
    println!("  rxplan status");
    println!("  {}", "-".repeat(35));

    let (ok, label) = match (status.running, status.initialized) {
        (true, true) => (true, "running"),
        (true, false) => (false, "running, no reference data"),
        (false, _) => (false, "not running"),
    };
    match (ok, use_color) {
        (true, true) => println!("    State:    {} {}", "✓".green(), label.green()),
        (false, true) => println!("    State:    {} {}", "✗".red(), label.red()),
        (true, false) => println!("    State:    [OK] {label}"),
        (false, false) => println!("    State:    [FAIL] {label}"),
    }

    for (name, source) in &status.sources {
        let loaded = source.loaded_at.as_deref().unwrap_or("never");
        println!(
            "    {name:<9} {} pairs, {} bins, loaded {loaded}",
            source.pairs, source.bins
        );
    }

    println!("    Endpoint: {}", status.endpoint);
    if !status.running {
        println!();
        println!("  Start with: rxplan serve");
    }
    println!();
}

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rxplan refresh` command implementation.

use std::io::IsTerminal;

use rxplan_config::RxplanConfig;
use rxplan_core::RxplanError;
use rxplan_reference::{RefreshReport, SourceOutcome};

use crate::serve::{Pipeline, init_tracing};

/// Download every source, write the cache, and print the outcome.
///
/// Fails when no source could be loaded.
pub async fn run_refresh(config: &RxplanConfig, json: bool) -> Result<(), RxplanError> {
    init_tracing(&config.server.log_level);

    let pipeline = Pipeline::from_config(config)?;
    let report = pipeline.refresher.refresh_all().await;

    if json {
        let body = serde_json::to_string_pretty(&report)
            .map_err(|e| RxplanError::Internal(format!("failed to encode report: {e}")))?;
        println!("{body}");
    } else {
        print_report(&report, std::io::stdout().is_terminal());
    }

    if report.all_failed() {
        return Err(RxplanError::Internal(
            "no reference source could be loaded".to_string(),
        ));
    }
    Ok(())
}

fn describe(outcome: &SourceOutcome) -> String {
    match outcome {
        SourceOutcome::Loaded {
            rows_kept,
            rows_dropped,
            pairs,
        } => format!("{pairs} pairs ({rows_kept} rows kept, {rows_dropped} dropped)"),
        SourceOutcome::LoadedFromCache { pairs, error, .. } => {
            format!("{pairs} pairs from cache (download failed: {error})")
        }
        SourceOutcome::Failed { error } => error.clone(),
    }
}

fn print_report(report: &RefreshReport, use_color: bool) {
    use colored::Colorize;

    println!();
    println!("  rxplan refresh");
    println!("  {}", "-".repeat(35));
    for (source, outcome) in &report.sources {
        let mark = match (outcome.is_failure(), use_color) {
            (false, true) => "✓".green().to_string(),
            (true, true) => "✗".red().to_string(),
            (false, false) => "[OK]".to_string(),
            (true, false) => "[FAIL]".to_string(),
        };
        println!("    {:<9} {mark} {}", source.to_string(), describe(outcome));
    }
    println!();
}

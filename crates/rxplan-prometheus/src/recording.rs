// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder can collect these metrics.

use metrics::{describe_counter, describe_gauge};

pub const CLASSIFICATIONS_TOTAL: &str = "rxplan_classifications_total";
pub const REFRESH_TOTAL: &str = "rxplan_reference_refresh_total";
pub const REFERENCE_PAIRS: &str = "rxplan_reference_pairs";
pub const REFERENCE_BINS: &str = "rxplan_reference_bins";

/// Register all rxplan metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        CLASSIFICATIONS_TOTAL,
        "Classifications served, by deciding stage and plan label"
    );
    describe_counter!(
        REFRESH_TOTAL,
        "Reference source refresh attempts, by source and outcome"
    );
    describe_gauge!(REFERENCE_PAIRS, "BIN|PCN pairs currently loaded per source");
    describe_gauge!(REFERENCE_BINS, "Distinct BINs currently loaded per source");
}

/// Count one classification.
pub fn record_classification(stage: &str, plan: &str) {
    metrics::counter!(
        CLASSIFICATIONS_TOTAL,
        "stage" => stage.to_string(),
        "plan" => plan.to_string()
    )
    .increment(1);
}

/// Count one refresh attempt for `source`.
pub fn record_refresh(source: &str, outcome: &str) {
    metrics::counter!(
        REFRESH_TOTAL,
        "source" => source.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Publish the table sizes of a freshly loaded source.
pub fn set_reference_size(source: &str, pairs: usize, bins: usize) {
    metrics::gauge!(REFERENCE_PAIRS, "source" => source.to_string()).set(pairs as f64);
    metrics::gauge!(REFERENCE_BINS, "source" => source.to_string()).set(bins as f64);
}

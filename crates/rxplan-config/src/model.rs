// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for rxplan.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use rxplan_core::PlanCategory;
use serde::{Deserialize, Serialize};

/// CMS Part D BIN/PCN crosswalk.
pub const DEFAULT_PARTD_URL: &str =
    "https://download.cms.gov/data-center/partd/cms_partd_binpcn_crosswalk_latest.csv";

/// State Medicaid BIN/PCN master list.
pub const DEFAULT_MEDICAID_URL: &str =
    "https://raw.githubusercontent.com/your-org/data/master/state_medicaid_binpcn_current.csv";

/// Top-level rxplan configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RxplanConfig {
    /// HTTP listener and logging settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Reference-data sources and on-disk cache.
    #[serde(default)]
    pub reference: ReferenceConfig,

    /// Heuristic stage tuning.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Expose Prometheus metrics at `/metrics`.
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

/// Reference-data source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceConfig {
    /// Location of the Medicare Part D crosswalk (http(s) URL, `file://` URL, or path).
    #[serde(default = "default_partd_url")]
    pub partd_url: String,

    /// Location of the State Medicaid master list.
    #[serde(default = "default_medicaid_url")]
    pub medicaid_url: String,

    /// Directory where downloaded CSVs are cached and served from `/data`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Timeout for a single source download, in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            partd_url: default_partd_url(),
            medicaid_url: default_medicaid_url(),
            data_dir: default_data_dir(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_partd_url() -> String {
    DEFAULT_PARTD_URL.to_string()
}

fn default_medicaid_url() -> String {
    DEFAULT_MEDICAID_URL.to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

/// Heuristic classifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Minimum accumulated score for a heuristic match.
    #[serde(default = "default_heuristic_threshold")]
    pub heuristic_threshold: f64,

    /// Category precedence when heuristic scores tie.
    #[serde(default = "default_tie_break_order")]
    pub tie_break_order: Vec<PlanCategory>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            heuristic_threshold: default_heuristic_threshold(),
            tie_break_order: default_tie_break_order(),
        }
    }
}

fn default_heuristic_threshold() -> f64 {
    0.6
}

fn default_tie_break_order() -> Vec<PlanCategory> {
    vec![
        PlanCategory::Medicare,
        PlanCategory::Medicaid,
        PlanCategory::Commercial,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let config = RxplanConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.reference.partd_url, DEFAULT_PARTD_URL);
        assert_eq!(config.reference.data_dir, "data");
        assert!((config.classifier.heuristic_threshold - 0.6).abs() < f64::EPSILON);
        assert_eq!(
            config.classifier.tie_break_order,
            vec![
                PlanCategory::Medicare,
                PlanCategory::Medicaid,
                PlanCategory::Commercial
            ]
        );
    }

    #[test]
    fn tie_break_order_deserializes_lowercase() {
        let toml_str = r#"
[classifier]
tie_break_order = ["commercial", "medicaid", "medicare"]
"#;
        let config: RxplanConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.classifier.tie_break_order[0], PlanCategory::Commercial);
    }
}

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express: a usable bind address, source
//! locations with a supported scheme, a sane threshold, and a tie-break
//! order that names every category exactly once.

use std::collections::HashSet;

use rxplan_core::PlanCategory;

use crate::diagnostic::ConfigError;
use crate::model::RxplanConfig;

/// Validate a deserialized configuration.
///
/// Collects every failure rather than stopping at the first one.
pub fn validate_config(config: &RxplanConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        ));
    }

    for (key, location) in [
        ("reference.partd_url", &config.reference.partd_url),
        ("reference.medicaid_url", &config.reference.medicaid_url),
    ] {
        if let Err(reason) = check_location(location) {
            fail(format!("{key} {reason}"));
        }
    }

    if config.reference.data_dir.trim().is_empty() {
        fail("reference.data_dir must not be empty".to_string());
    }

    if config.reference.fetch_timeout_secs == 0 {
        fail("reference.fetch_timeout_secs must be at least 1".to_string());
    }

    let threshold = config.classifier.heuristic_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        fail(format!(
            "classifier.heuristic_threshold must be in (0, 1], got {threshold}"
        ));
    }

    let order = &config.classifier.tie_break_order;
    let distinct: HashSet<&PlanCategory> = order.iter().collect();
    if order.len() != 3 || distinct.len() != 3 {
        fail(format!(
            "classifier.tie_break_order must list medicare, medicaid and commercial exactly once, got {order:?}"
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A source location is an http(s) URL, a `file://` URL, or a bare path.
fn check_location(location: &str) -> Result<(), String> {
    let location = location.trim();
    if location.is_empty() {
        return Err("must not be empty".to_string());
    }
    match location.split_once("://") {
        None => Ok(()),
        Some(("http" | "https" | "file", rest)) if !rest.is_empty() => Ok(()),
        Some((scheme, _)) => Err(format!(
            "`{location}` uses unsupported scheme `{scheme}` (expected http, https or file)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &RxplanConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&RxplanConfig::default()).is_ok());
    }

    #[test]
    fn empty_data_dir_fails_validation() {
        let mut config = RxplanConfig::default();
        config.reference.data_dir = " ".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("data_dir")));
    }

    #[test]
    fn ftp_source_is_rejected() {
        let mut config = RxplanConfig::default();
        config.reference.medicaid_url = "ftp://example.org/medicaid.csv".to_string();
        let msgs = messages(&config);
        assert!(msgs.iter().any(|m| m.contains("medicaid_url") && m.contains("ftp")));
    }

    #[test]
    fn file_and_path_sources_are_accepted() {
        let mut config = RxplanConfig::default();
        config.reference.partd_url = "file:///srv/partd.csv".to_string();
        config.reference.medicaid_url = "fixtures/medicaid.csv".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn threshold_out_of_range_fails() {
        let mut config = RxplanConfig::default();
        config.classifier.heuristic_threshold = 1.5;
        assert!(messages(&config).iter().any(|m| m.contains("heuristic_threshold")));

        config.classifier.heuristic_threshold = 0.0;
        assert!(messages(&config).iter().any(|m| m.contains("heuristic_threshold")));
    }

    #[test]
    fn duplicate_tie_break_category_fails() {
        let mut config = RxplanConfig::default();
        config.classifier.tie_break_order = vec![
            PlanCategory::Medicare,
            PlanCategory::Medicare,
            PlanCategory::Commercial,
        ];
        assert!(messages(&config).iter().any(|m| m.contains("tie_break_order")));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = RxplanConfig::default();
        config.server.host = String::new();
        config.reference.fetch_timeout_secs = 0;
        config.classifier.tie_break_order.clear();
        assert_eq!(validate_config(&config).unwrap_err().len(), 3);
    }
}

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the reference store, classifier, and transports.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::normalize::normalize;

/// Plan label emitted when neither stage reaches a decision.
pub const UNKNOWN_PLAN: &str = "Unknown – manual review";

/// Identifies one of the two ingested reference sources.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum SourceId {
    /// CMS Medicare Part D BIN/PCN crosswalk.
    #[strum(serialize = "partd")]
    #[serde(rename = "partd")]
    PartD,
    /// State Medicaid BIN/PCN master list.
    #[strum(serialize = "medicaid")]
    #[serde(rename = "medicaid")]
    Medicaid,
}

impl SourceId {
    /// File name used when caching this source on disk.
    pub fn cache_file_name(&self) -> &'static str {
        match self {
            SourceId::PartD => "partd.csv",
            SourceId::Medicaid => "medicaid.csv",
        }
    }
}

/// Plan categories scored by the heuristic stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanCategory {
    Medicare,
    Medicaid,
    Commercial,
}

impl PlanCategory {
    /// Label emitted when the heuristic stage picks this category.
    pub fn likely_label(&self) -> &'static str {
        match self {
            PlanCategory::Medicare => "Likely Medicare Part D",
            PlanCategory::Medicaid => "Likely Medicaid",
            PlanCategory::Commercial => "Commercial",
        }
    }
}

/// Raw card fields as submitted by a caller. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFields {
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub bin: Option<String>,
    #[serde(default)]
    pub pcn: Option<String>,
}

impl CardFields {
    /// Build card fields from an arbitrary JSON value.
    ///
    /// Non-object values and non-string fields are treated as absent, so any
    /// request body produces a usable (possibly empty) set of fields.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        Self {
            member_id: field("memberId"),
            group: field("group"),
            bin: field("bin"),
            pcn: field("pcn"),
        }
    }
}

/// Card fields after normalization: uppercase, no whitespace, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedCardFields {
    pub member_id: String,
    pub group: String,
    pub bin: String,
    pub pcn: String,
}

impl From<&CardFields> for NormalizedCardFields {
    fn from(raw: &CardFields) -> Self {
        let norm = |v: &Option<String>| normalize(v.as_deref().unwrap_or_default());
        Self {
            member_id: norm(&raw.member_id),
            group: norm(&raw.group),
            bin: norm(&raw.bin),
            pcn: norm(&raw.pcn),
        }
    }
}

/// Final answer returned to callers; this is the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Human-readable plan label, or [`UNKNOWN_PLAN`].
    pub plan: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

impl ClassificationResult {
    /// The "needs manual review" fallback.
    pub fn unknown() -> Self {
        Self {
            plan: UNKNOWN_PLAN.to_string(),
            confidence: 0.0,
        }
    }

    /// Whether this result is the manual-review fallback.
    pub fn is_unknown(&self) -> bool {
        self.plan == UNKNOWN_PLAN
    }
}

/// Which stage of the engine produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DecisionStage {
    Deterministic,
    Heuristic,
    Fallback,
}

/// Health status reported for liveness endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Reference data loaded for every source.
    Healthy,
    /// Serving, but some reference data is missing.
    Degraded(String),
}

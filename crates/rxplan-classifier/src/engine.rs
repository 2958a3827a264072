// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-stage classification pipeline shared by every transport.
//!
//! Orchestrates: normalize > deterministic lookup > heuristic scoring >
//! manual-review fallback. Both stages read a single store snapshot taken at
//! the start of the call.

use std::sync::Arc;

use rxplan_config::model::ClassifierConfig;
use rxplan_core::{
    CardFields, ClassificationResult, DecisionStage, HealthStatus, NormalizedCardFields, SourceId,
};
use rxplan_reference::{IngestError, IngestReport, ReferenceStore};
use tracing::debug;

use crate::deterministic::DeterministicClassifier;
use crate::heuristic::HeuristicClassifier;

/// Classification engine over a shared [`ReferenceStore`].
pub struct ClassificationEngine {
    store: Arc<ReferenceStore>,
    deterministic: DeterministicClassifier,
    heuristic: HeuristicClassifier,
}

impl ClassificationEngine {
    /// Engine with the default heuristic threshold and tie-break order.
    pub fn new(store: Arc<ReferenceStore>) -> Self {
        Self::with_heuristic(store, HeuristicClassifier::new())
    }

    pub fn with_heuristic(store: Arc<ReferenceStore>, heuristic: HeuristicClassifier) -> Self {
        Self {
            store,
            deterministic: DeterministicClassifier::new(),
            heuristic,
        }
    }

    pub fn from_config(store: Arc<ReferenceStore>, config: &ClassifierConfig) -> Self {
        let heuristic = HeuristicClassifier::new()
            .with_threshold(config.heuristic_threshold)
            .with_tie_break_order(&config.tie_break_order);
        Self::with_heuristic(store, heuristic)
    }

    pub fn store(&self) -> &Arc<ReferenceStore> {
        &self.store
    }

    /// Classify raw card fields. Always returns a result.
    pub fn classify(&self, fields: &CardFields) -> ClassificationResult {
        self.classify_with_stage(fields).0
    }

    /// Classify and report which stage decided.
    pub fn classify_with_stage(&self, fields: &CardFields) -> (ClassificationResult, DecisionStage) {
        let normalized = NormalizedCardFields::from(fields);
        let snapshot = self.store.snapshot();

        let (result, stage) = if let Some(result) =
            self.deterministic
                .classify(&snapshot, &normalized.bin, &normalized.pcn)
        {
            (result, DecisionStage::Deterministic)
        } else if let Some(result) = self.heuristic.classify(&snapshot, &normalized) {
            (result, DecisionStage::Heuristic)
        } else {
            (ClassificationResult::unknown(), DecisionStage::Fallback)
        };

        debug!(
            %stage,
            plan = result.plan.as_str(),
            confidence = result.confidence,
            bin = normalized.bin.as_str(),
            pcn = normalized.pcn.as_str(),
            "card classified"
        );
        rxplan_prometheus::record_classification(&stage.to_string(), &result.plan);

        (result, stage)
    }

    /// Classify an arbitrary JSON body. Non-objects and non-string fields
    /// count as empty input.
    pub fn classify_json(&self, body: &serde_json::Value) -> ClassificationResult {
        self.classify(&CardFields::from_json(body))
    }

    /// Replace one source's tables from raw CSV text.
    pub fn ingest(&self, source_id: SourceId, raw_text: &str) -> Result<IngestReport, IngestError> {
        self.store.ingest(source_id, raw_text)
    }

    /// True once any reference source has loaded.
    pub fn health(&self) -> bool {
        self.store.health()
    }

    /// Healthy when every source has loaded, degraded otherwise.
    pub fn status(&self) -> HealthStatus {
        let snapshot = self.store.snapshot();
        let missing: Vec<String> = [SourceId::PartD, SourceId::Medicaid]
            .into_iter()
            .filter(|id| !snapshot.source(*id).is_loaded())
            .map(|id| id.to_string())
            .collect();
        if missing.is_empty() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded(format!("not loaded: {}", missing.join(", ")))
        }
    }
}

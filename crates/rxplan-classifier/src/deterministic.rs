// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exact reference lookups on BIN and PCN.

use rxplan_core::ClassificationResult;
use rxplan_reference::{ReferenceSnapshot, pair_key};

pub const MEDICARE_PAIR_LABEL: &str = "Medicare Part D / MA-PD";
pub const MEDICAID_PAIR_LABEL: &str = "State Medicaid";
pub const LIKELY_MEDICARE_LABEL: &str = "Likely Medicare Part D";
pub const LIKELY_MEDICAID_LABEL: &str = "Likely Medicaid";
pub const COMMERCIAL_LABEL: &str = "Commercial";

const PAIR_CONFIDENCE: f64 = 0.99;
const BIN_CONFIDENCE: f64 = 0.90;

/// First-match-wins lookup against the reference tables.
///
/// Rules, in priority order:
/// 1. `BIN|PCN` in the Part D pairs
/// 2. `BIN|PCN` in the Medicaid pairs
/// 3. BIN in the Part D BINs
/// 4. BIN in the Medicaid BINs
/// 5. BIN in the fixed commercial BINs
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicClassifier;

impl DeterministicClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify normalized `bin` and `pcn`; `None` when no rule matches.
    pub fn classify(
        &self,
        snapshot: &ReferenceSnapshot,
        bin: &str,
        pcn: &str,
    ) -> Option<ClassificationResult> {
        let key = pair_key(bin, pcn);

        let (plan, confidence) = if snapshot.is_medicare_pair(&key) {
            (MEDICARE_PAIR_LABEL, PAIR_CONFIDENCE)
        } else if snapshot.is_medicaid_pair(&key) {
            (MEDICAID_PAIR_LABEL, PAIR_CONFIDENCE)
        } else if snapshot.is_medicare_bin(bin) {
            (LIKELY_MEDICARE_LABEL, BIN_CONFIDENCE)
        } else if snapshot.is_medicaid_bin(bin) {
            (LIKELY_MEDICAID_LABEL, BIN_CONFIDENCE)
        } else if snapshot.is_commercial_bin(bin) {
            (COMMERCIAL_LABEL, BIN_CONFIDENCE)
        } else {
            return None;
        };

        Some(ClassificationResult {
            plan: plan.to_string(),
            confidence,
        })
    }
}

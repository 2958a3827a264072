// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weighted pattern scoring for cards the reference tables do not cover.
//!
//! Every signal adds a fixed weight to one of three category scores. The
//! highest score wins when it reaches the threshold. Weights are kept in
//! hundredths so that sums compare exactly (`25 + 35 == 60`).

use regex::Regex;
use rxplan_core::{ClassificationResult, NormalizedCardFields, PlanCategory};
use rxplan_reference::ReferenceSnapshot;

/// Default minimum winning score.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Default tie-break order: earliest wins.
pub const DEFAULT_TIE_BREAK_ORDER: [PlanCategory; 3] = [
    PlanCategory::Medicare,
    PlanCategory::Medicaid,
    PlanCategory::Commercial,
];

const PCN_WEIGHT: u32 = 25;
const GROUP_WEIGHT: u32 = 15;
const MEMBER_ID_WEIGHT: u32 = 35;
const BIN_WEIGHT: u32 = 25;

const MEDICARE_PCN: &str = "MEDD|ADV|MAPD|MSP";
const MEDICAID_PCN: &str = "MCD|MEDICAID";
const MEDICARE_GROUP: &str = "PARTD|RXMAPD";
// Medicare Beneficiary Identifier shape.
const MBI: &str = r"^[0-9][A-Z][0-9][A-Z][0-9][0-9][A-Z]{2}[0-9]{2}$";
const MEDICAID_MEMBER_ID: &str = r"^[0-9]{9,12}$";
const COMMERCIAL_MEMBER_ID: &str = r"^[A-Z]{3}[0-9A-Za-z_]{6,14}$";

/// Per-category scores, in hundredths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scores {
    pub medicare: u32,
    pub medicaid: u32,
    pub commercial: u32,
}

impl Scores {
    pub fn get(&self, category: PlanCategory) -> u32 {
        match category {
            PlanCategory::Medicare => self.medicare,
            PlanCategory::Medicaid => self.medicaid,
            PlanCategory::Commercial => self.commercial,
        }
    }

    fn add(&mut self, category: PlanCategory, points: u32) {
        match category {
            PlanCategory::Medicare => self.medicare += points,
            PlanCategory::Medicaid => self.medicaid += points,
            PlanCategory::Commercial => self.commercial += points,
        }
    }
}

/// Pattern-scoring classifier with precompiled patterns.
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    medicare_pcn: Regex,
    medicaid_pcn: Regex,
    medicare_group: Regex,
    mbi: Regex,
    medicaid_member_id: Regex,
    commercial_member_id: Regex,
    threshold: u32,
    order: Vec<PlanCategory>,
}

impl HeuristicClassifier {
    /// Create a classifier with the default threshold and tie-break order.
    pub fn new() -> Self {
        // The patterns are constants; failing to compile one is a bug.
        let compile = |pattern: &str| Regex::new(pattern).expect("built-in pattern compiles");
        Self {
            medicare_pcn: compile(MEDICARE_PCN),
            medicaid_pcn: compile(MEDICAID_PCN),
            medicare_group: compile(MEDICARE_GROUP),
            mbi: compile(MBI),
            medicaid_member_id: compile(MEDICAID_MEMBER_ID),
            commercial_member_id: compile(COMMERCIAL_MEMBER_ID),
            threshold: to_points(DEFAULT_THRESHOLD),
            order: DEFAULT_TIE_BREAK_ORDER.to_vec(),
        }
    }

    /// Replace the minimum winning score (a fraction in `(0, 1]`).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = to_points(threshold);
        self
    }

    /// Replace the tie-break order. Categories left out are appended in
    /// their default order so that every category can still win.
    pub fn with_tie_break_order(mut self, order: &[PlanCategory]) -> Self {
        let mut full: Vec<PlanCategory> = Vec::with_capacity(DEFAULT_TIE_BREAK_ORDER.len());
        for category in order.iter().chain(DEFAULT_TIE_BREAK_ORDER.iter()) {
            if !full.contains(category) {
                full.push(*category);
            }
        }
        self.order = full;
        self
    }

    pub fn threshold(&self) -> f64 {
        f64::from(self.threshold) / 100.0
    }

    pub fn tie_break_order(&self) -> &[PlanCategory] {
        &self.order
    }

    /// Accumulate every signal for `fields`.
    pub fn score(&self, snapshot: &ReferenceSnapshot, fields: &NormalizedCardFields) -> Scores {
        let mut scores = Scores::default();

        // Signal 1: PCN patterns
        if self.medicare_pcn.is_match(&fields.pcn) {
            scores.add(PlanCategory::Medicare, PCN_WEIGHT);
        }
        if self.medicaid_pcn.is_match(&fields.pcn) {
            scores.add(PlanCategory::Medicaid, PCN_WEIGHT);
        }

        // Signal 2: group pattern
        if self.medicare_group.is_match(&fields.group) {
            scores.add(PlanCategory::Medicare, GROUP_WEIGHT);
        }

        // Signal 3: member ID shape
        if self.mbi.is_match(&fields.member_id) {
            scores.add(PlanCategory::Medicare, MEMBER_ID_WEIGHT);
        }
        if self.medicaid_member_id.is_match(&fields.member_id) {
            scores.add(PlanCategory::Medicaid, MEMBER_ID_WEIGHT);
        }
        if self.commercial_member_id.is_match(&fields.member_id) {
            scores.add(PlanCategory::Commercial, MEMBER_ID_WEIGHT);
        }

        // Signal 4: BIN membership
        if snapshot.is_medicare_bin(&fields.bin) {
            scores.add(PlanCategory::Medicare, BIN_WEIGHT);
        }
        if snapshot.is_medicaid_bin(&fields.bin) {
            scores.add(PlanCategory::Medicaid, BIN_WEIGHT);
        }
        if snapshot.is_commercial_bin(&fields.bin) {
            scores.add(PlanCategory::Commercial, BIN_WEIGHT);
        }

        scores
    }

    /// Highest-scoring category, ties resolved by the configured order.
    pub fn winner(&self, scores: &Scores) -> (PlanCategory, u32) {
        let mut best = (self.order[0], scores.get(self.order[0]));
        for &category in &self.order[1..] {
            let points = scores.get(category);
            if points > best.1 {
                best = (category, points);
            }
        }
        best
    }

    /// Classify `fields`; `None` when the winning score is below threshold.
    pub fn classify(
        &self,
        snapshot: &ReferenceSnapshot,
        fields: &NormalizedCardFields,
    ) -> Option<ClassificationResult> {
        let scores = self.score(snapshot, fields);
        let (category, points) = self.winner(&scores);
        if points == 0 || points < self.threshold {
            return None;
        }
        Some(ClassificationResult {
            plan: category.likely_label().to_string(),
            confidence: f64::from(points) / 100.0,
        })
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn to_points(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use rxplan_core::{CardFields, SourceId};
    use rxplan_reference::ReferenceStore;

    use super::*;

    fn fields(member_id: &str, group: &str, bin: &str, pcn: &str) -> NormalizedCardFields {
        NormalizedCardFields::from(&CardFields {
            member_id: Some(member_id.into()),
            group: Some(group.into()),
            bin: Some(bin.into()),
            pcn: Some(pcn.into()),
        })
    }

    fn empty() -> std::sync::Arc<ReferenceSnapshot> {
        ReferenceStore::new().snapshot()
    }

    #[test]
    fn signals_accumulate_in_hundredths() {
        let h = HeuristicClassifier::new();
        let s = h.score(&empty(), &fields("1A2B34CD56", "RXPARTD", "", "MEDDADV"));
        assert_eq!(s.medicare, 25 + 15 + 35);
        assert_eq!(s.medicaid, 0);
        assert_eq!(s.commercial, 0);
    }

    #[test]
    fn above_threshold_matches() {
        let h = HeuristicClassifier::new();
        let r = h
            .classify(&empty(), &fields("1A2B34CD56", "PARTD", "", "MEDD"))
            .unwrap();
        assert_eq!(r.plan, "Likely Medicare Part D");
        assert_eq!(r.confidence, 0.75);
    }

    #[test]
    fn exactly_threshold_matches() {
        let h = HeuristicClassifier::new();
        let r = h
            .classify(&empty(), &fields("123456789", "", "", "MCDNY"))
            .unwrap();
        assert_eq!(r.plan, "Likely Medicaid");
        assert_eq!(r.confidence, 0.6);
    }

    #[test]
    fn below_threshold_is_none() {
        let h = HeuristicClassifier::new();
        // 0.25 + 0.15 = 0.40
        assert!(h.classify(&empty(), &fields("", "PARTD", "", "MAPD")).is_none());
        // 0.35 alone
        assert!(h.classify(&empty(), &fields("1A2B34CD56", "", "999999", "XYZ")).is_none());
        // 0.15 + 0.35 = 0.50, the highest total under 0.60
        assert!(h.classify(&empty(), &fields("1A2B34CD56", "PARTD", "", "XYZ")).is_none());
    }

    #[test]
    fn reference_bins_contribute() {
        let store = ReferenceStore::new();
        store.ingest(SourceId::Medicaid, "BIN,PCN\n610494,MCDNY\n").unwrap();
        let h = HeuristicClassifier::new();
        let s = h.score(&store.snapshot(), &fields("", "", "610494", ""));
        assert_eq!(s.medicaid, 25);

        let s = h.score(&store.snapshot(), &fields("ABC123456", "", "610502", ""));
        assert_eq!(s.commercial, 60);
    }

    #[test]
    fn bin_signal_lifts_score_to_085() {
        let store = ReferenceStore::new();
        store.ingest(SourceId::Medicaid, "BIN,PCN\n610494,MCDNY\n").unwrap();
        let r = HeuristicClassifier::new()
            .classify(&store.snapshot(), &fields("123456789", "", "610494", "MCDOH"))
            .unwrap();
        assert_eq!(r.plan, "Likely Medicaid");
        assert_eq!(r.confidence, 0.85);
    }

    #[test]
    fn commercial_member_id_and_bin() {
        let h = HeuristicClassifier::new();
        let r = h
            .classify(&empty(), &fields("ABC123456", "", "003858", ""))
            .unwrap();
        assert_eq!(r.plan, "Commercial");
        assert_eq!(r.confidence, 0.6);
    }

    #[test]
    fn tie_goes_to_earliest_in_default_order() {
        let h = HeuristicClassifier::new();
        let scores = Scores {
            medicare: 60,
            medicaid: 60,
            commercial: 60,
        };
        assert_eq!(h.winner(&scores), (PlanCategory::Medicare, 60));

        let scores = Scores {
            medicare: 0,
            medicaid: 60,
            commercial: 60,
        };
        assert_eq!(h.winner(&scores), (PlanCategory::Medicaid, 60));
    }

    #[test]
    fn tie_break_order_is_configurable() {
        let h = HeuristicClassifier::new().with_tie_break_order(&[PlanCategory::Commercial]);
        assert_eq!(
            h.tie_break_order(),
            &[
                PlanCategory::Commercial,
                PlanCategory::Medicare,
                PlanCategory::Medicaid
            ]
        );
        let scores = Scores {
            medicare: 60,
            medicaid: 60,
            commercial: 60,
        };
        assert_eq!(h.winner(&scores).0, PlanCategory::Commercial);
    }

    #[test]
    fn threshold_is_configurable() {
        let h = HeuristicClassifier::new().with_threshold(0.35);
        assert_eq!(h.threshold(), 0.35);
        let r = h.classify(&empty(), &fields("1A2B34CD56", "", "", "")).unwrap();
        assert_eq!(r.plan, "Likely Medicare Part D");
        assert_eq!(r.confidence, 0.35);
    }

    #[test]
    fn member_id_patterns() {
        let h = HeuristicClassifier::new();
        let snap = empty();
        let medicare = |id: &str| h.score(&snap, &fields(id, "", "", "")).medicare;
        assert_eq!(medicare("1A2B34CD56"), 35);
        assert_eq!(medicare("1a2b 34cd56"), 35);
        assert_eq!(medicare("1AB2C34DE56"), 0);
        assert_eq!(medicare("1AA2AA3AA45"), 0);
        assert_eq!(medicare("1A2B34CD5"), 0);
        assert_eq!(medicare("AA2B34CD56"), 0);

        let medicaid = |id: &str| h.score(&snap, &fields(id, "", "", "")).medicaid;
        assert_eq!(medicaid("12345678"), 0);
        assert_eq!(medicaid("123456789"), 35);
        assert_eq!(medicaid("123456789012"), 35);
        assert_eq!(medicaid("1234567890123"), 0);

        let commercial = |id: &str| h.score(&snap, &fields(id, "", "", "")).commercial;
        assert_eq!(commercial("ABC12345"), 0);
        assert_eq!(commercial("ABC123456"), 35);
        assert_eq!(commercial("ABC_12345678901234"), 0);
        assert_eq!(commercial("AB1234567"), 0);
    }

    #[test]
    fn mbi_and_pcn_reach_threshold() {
        let h = HeuristicClassifier::new();
        let r = h
            .classify(&empty(), &fields("1A2B34CD56", "", "", "MEDD"))
            .unwrap();
        assert_eq!(r.plan, "Likely Medicare Part D");
        assert_eq!(r.confidence, 0.6);
    }

    #[test]
    fn eleven_character_member_id_scores_nothing() {
        let h = HeuristicClassifier::new();
        let s = h.score(&empty(), &fields("1AB2C34DE56", "", "999999", "XYZ"));
        assert_eq!(s, Scores::default());
        assert!(h.classify(&empty(), &fields("1AB2C34DE56", "", "999999", "XYZ")).is_none());
    }

    #[test]
    fn empty_fields_score_nothing() {
        let h = HeuristicClassifier::new();
        assert_eq!(h.score(&empty(), &fields("", "", "", "")), Scores::default());
        assert!(h.classify(&empty(), &fields("", "", "", "")).is_none());
    }
}

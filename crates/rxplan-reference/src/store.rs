// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Swappable snapshot of the BIN/PCN reference tables.
//!
//! Readers take an `Arc<ReferenceSnapshot>` and keep using it for the whole
//! classification. Ingestion builds a new [`SourceTables`] off to the side
//! and publishes it with one atomic swap, so a reader never sees a
//! half-populated set and a failed refresh leaves the old tables in place.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use rxplan_core::SourceId;

use crate::ingest::{self, IngestError, IngestReport};

/// BINs known to belong to commercial processors. Fixed; never ingested.
pub const COMMERCIAL_BINS: [&str; 4] = ["610502", "020099", "003858", "600428"];

static COMMERCIAL_BIN_SET: LazyLock<Arc<HashSet<String>>> = LazyLock::new(|| {
    Arc::new(COMMERCIAL_BINS.iter().map(|b| b.to_string()).collect())
});

/// Build the `BIN|PCN` lookup key.
pub fn pair_key(bin: &str, pcn: &str) -> String {
    format!("{bin}|{pcn}")
}

/// Lookup tables for one reference source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTables {
    /// `BIN|PCN` keys.
    pub pairs: HashSet<String>,
    /// Bare BINs.
    pub bins: HashSet<String>,
    /// When these tables were published. `None` means never loaded.
    pub loaded_at: Option<DateTime<Utc>>,
}

impl SourceTables {
    pub fn contains_pair(&self, key: &str) -> bool {
        self.pairs.contains(key)
    }

    pub fn contains_bin(&self, bin: &str) -> bool {
        self.bins.contains(bin)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }
}

/// Immutable view of all reference data at one point in time.
#[derive(Debug, Clone)]
pub struct ReferenceSnapshot {
    medicare: Arc<SourceTables>,
    medicaid: Arc<SourceTables>,
    commercial_bins: Arc<HashSet<String>>,
}

impl Default for ReferenceSnapshot {
    fn default() -> Self {
        Self {
            medicare: Arc::default(),
            medicaid: Arc::default(),
            commercial_bins: Arc::clone(&COMMERCIAL_BIN_SET),
        }
    }
}

impl ReferenceSnapshot {
    /// Tables for one source.
    pub fn source(&self, id: SourceId) -> &SourceTables {
        match id {
            SourceId::PartD => &self.medicare,
            SourceId::Medicaid => &self.medicaid,
        }
    }

    fn slot_mut(&mut self, id: SourceId) -> &mut Arc<SourceTables> {
        match id {
            SourceId::PartD => &mut self.medicare,
            SourceId::Medicaid => &mut self.medicaid,
        }
    }

    /// Exact Part D BIN/PCN match.
    pub fn is_medicare_pair(&self, key: &str) -> bool {
        self.medicare.contains_pair(key)
    }

    /// Exact State Medicaid BIN/PCN match.
    pub fn is_medicaid_pair(&self, key: &str) -> bool {
        self.medicaid.contains_pair(key)
    }

    pub fn is_medicare_bin(&self, bin: &str) -> bool {
        self.medicare.contains_bin(bin)
    }

    pub fn is_medicaid_bin(&self, bin: &str) -> bool {
        self.medicaid.contains_bin(bin)
    }

    pub fn is_commercial_bin(&self, bin: &str) -> bool {
        self.commercial_bins.contains(bin)
    }

    /// True once at least one source has been published.
    pub fn is_initialized(&self) -> bool {
        self.medicare.is_loaded() || self.medicaid.is_loaded()
    }
}

/// Process-wide holder of the current [`ReferenceSnapshot`].
#[derive(Debug, Default)]
pub struct ReferenceStore {
    current: ArcSwap<ReferenceSnapshot>,
}

impl ReferenceStore {
    /// An empty store: only the fixed commercial BINs are known.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot. Cheap; hold it for the duration of one request.
    pub fn snapshot(&self) -> Arc<ReferenceSnapshot> {
        self.current.load_full()
    }

    /// Parse `raw_text` and, only if parsing succeeds, replace the tables
    /// for `source_id`. On error the previous tables stay in place.
    pub fn ingest(&self, source_id: SourceId, raw_text: &str) -> Result<IngestReport, IngestError> {
        let (tables, report) = ingest::parse_source(raw_text)?;
        self.replace(source_id, tables);
        Ok(report)
    }

    /// Publish `tables` for `source_id`, stamping the load time.
    pub fn replace(&self, source_id: SourceId, mut tables: SourceTables) {
        tables.loaded_at = Some(Utc::now());
        let tables = Arc::new(tables);
        self.current.rcu(|snapshot| {
            let mut next = ReferenceSnapshot::clone(snapshot);
            *next.slot_mut(source_id) = Arc::clone(&tables);
            next
        });
        rxplan_prometheus::set_reference_size(
            &source_id.to_string(),
            tables.pairs.len(),
            tables.bins.len(),
        );
    }

    /// Liveness: true once any source has loaded.
    pub fn health(&self) -> bool {
        self.current.load().is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARTD_CSV: &str = "BIN,PCN,PLAN\n004336,MEDDADV,Acme\n610097,MEDDPRIME,Other\n";
    const MEDICAID_CSV: &str = "BIN,PCN\n610494,MCDNY\n";

    #[test]
    fn empty_store_knows_only_commercial_bins() {
        let store = ReferenceStore::new();
        let snap = store.snapshot();
        assert!(!snap.is_initialized());
        assert!(!store.health());
        assert!(snap.is_commercial_bin("610502"));
        assert!(snap.is_commercial_bin("600428"));
        assert!(!snap.is_medicare_bin("004336"));
    }

    #[test]
    fn ingest_populates_one_source() {
        let store = ReferenceStore::new();
        store.ingest(SourceId::PartD, PARTD_CSV).unwrap();

        let snap = store.snapshot();
        assert!(snap.is_medicare_pair(&pair_key("004336", "MEDDADV")));
        assert!(snap.is_medicare_bin("610097"));
        assert!(!snap.is_medicaid_bin("004336"));
        assert!(snap.source(SourceId::PartD).is_loaded());
        assert!(!snap.source(SourceId::Medicaid).is_loaded());
        assert!(store.health());
    }

    #[test]
    fn failed_ingest_keeps_previous_tables() {
        let store = ReferenceStore::new();
        store.ingest(SourceId::Medicaid, MEDICAID_CSV).unwrap();

        let err = store.ingest(SourceId::Medicaid, "STATE,PLAN\nNY,x\n");
        assert!(err.is_err());
        assert!(store.snapshot().is_medicaid_pair("610494|MCDNY"));
    }

    #[test]
    fn replacing_one_source_leaves_the_other() {
        let store = ReferenceStore::new();
        store.ingest(SourceId::PartD, PARTD_CSV).unwrap();
        store.ingest(SourceId::Medicaid, MEDICAID_CSV).unwrap();
        store
            .ingest(SourceId::Medicaid, "BIN,PCN\n999999,MCDXX\n")
            .unwrap();

        let snap = store.snapshot();
        assert!(snap.is_medicare_pair("004336|MEDDADV"));
        assert!(snap.is_medicaid_pair("999999|MCDXX"));
        assert!(!snap.is_medicaid_pair("610494|MCDNY"));
    }

    #[test]
    fn old_snapshot_is_unaffected_by_swap() {
        let store = ReferenceStore::new();
        let before = store.snapshot();
        store.ingest(SourceId::PartD, PARTD_CSV).unwrap();
        assert!(!before.is_medicare_bin("004336"));
        assert!(store.snapshot().is_medicare_bin("004336"));
    }

    #[test]
    fn ingesting_same_text_twice_is_idempotent() {
        let store = ReferenceStore::new();
        store.ingest(SourceId::PartD, PARTD_CSV).unwrap();
        let first = store.snapshot().source(SourceId::PartD).clone();
        store.ingest(SourceId::PartD, PARTD_CSV).unwrap();
        let second = store.snapshot().source(SourceId::PartD).clone();
        assert_eq!(first.pairs, second.pairs);
        assert_eq!(first.bins, second.bins);
    }
}

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a store, engine and refresher backed by a
//! [`MockFetcher`] and a temp cache directory. By default both sources are
//! scripted with the [`fixtures`](crate::fixtures) CSVs and loaded before
//! `build()` returns.

use std::path::Path;
use std::sync::Arc;

use rxplan_classifier::ClassificationEngine;
use rxplan_config::model::ClassifierConfig;
use rxplan_core::{CardFields, ClassificationResult, RxplanError, SourceId};
use rxplan_reference::{RefreshReport, Refresher, ReferenceStore, SourceSpec};

use crate::fixtures::{MEDICAID_CSV, MEDICAID_LOCATION, PARTD_CSV, PARTD_LOCATION};
use crate::mock_fetcher::MockFetcher;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    partd: Option<String>,
    medicaid: Option<String>,
    classifier: ClassifierConfig,
    refresh: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            partd: Some(PARTD_CSV.to_string()),
            medicaid: Some(MEDICAID_CSV.to_string()),
            classifier: ClassifierConfig::default(),
            refresh: true,
        }
    }

    /// Serve `csv` for the Part D source.
    pub fn with_partd(mut self, csv: &str) -> Self {
        self.partd = Some(csv.to_string());
        self
    }

    /// Serve `csv` for the Medicaid source.
    pub fn with_medicaid(mut self, csv: &str) -> Self {
        self.medicaid = Some(csv.to_string());
        self
    }

    /// Make the Part D fetch fail.
    pub fn without_partd(mut self) -> Self {
        self.partd = None;
        self
    }

    /// Make the Medicaid fetch fail.
    pub fn without_medicaid(mut self) -> Self {
        self.medicaid = None;
        self
    }

    pub fn with_classifier_config(mut self, config: ClassifierConfig) -> Self {
        self.classifier = config;
        self
    }

    /// Skip the initial refresh so the store starts empty.
    pub fn cold(mut self) -> Self {
        self.refresh = false;
        self
    }

    /// Build the harness, running the initial refresh unless [`cold`](Self::cold).
    pub async fn build(self) -> Result<TestHarness, RxplanError> {
        let temp_dir = tempfile::TempDir::new()?;

        let fetcher = Arc::new(MockFetcher::new());
        for (location, body) in [(PARTD_LOCATION, &self.partd), (MEDICAID_LOCATION, &self.medicaid)] {
            match body {
                Some(body) => fetcher.respond(location, body).await,
                None => fetcher.fail(location, "connection refused").await,
            }
        }

        let store = Arc::new(ReferenceStore::new());
        let engine = Arc::new(ClassificationEngine::from_config(
            Arc::clone(&store),
            &self.classifier,
        ));
        let refresher = Arc::new(Refresher::new(
            Arc::clone(&store),
            fetcher.clone(),
            vec![
                SourceSpec {
                    id: SourceId::PartD,
                    location: PARTD_LOCATION.to_string(),
                },
                SourceSpec {
                    id: SourceId::Medicaid,
                    location: MEDICAID_LOCATION.to_string(),
                },
            ],
            temp_dir.path(),
        ));

        let initial_report = if self.refresh {
            Some(refresher.refresh_all().await)
        } else {
            None
        };

        Ok(TestHarness {
            fetcher,
            store,
            engine,
            refresher,
            initial_report,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete classification stack over scripted sources.
pub struct TestHarness {
    /// The scripted fetcher; re-script it to drive later refreshes.
    pub fetcher: Arc<MockFetcher>,
    pub store: Arc<ReferenceStore>,
    pub engine: Arc<ClassificationEngine>,
    pub refresher: Arc<Refresher>,
    /// Report from the refresh run by `build()`, if any.
    pub initial_report: Option<RefreshReport>,
    /// Temp cache directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with both fixture sources loaded.
    pub async fn loaded() -> Result<Self, RxplanError> {
        Self::builder().build().await
    }

    pub fn data_dir(&self) -> &Path {
        self.refresher.cache_dir()
    }

    /// Classify from plain string slices; empty strings become absent fields.
    pub fn classify(&self, member_id: &str, group: &str, bin: &str, pcn: &str) -> ClassificationResult {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        self.engine.classify(&CardFields {
            member_id: opt(member_id),
            group: opt(group),
            bin: opt(bin),
            pcn: opt(pcn),
        })
    }
}

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-demand refresh of the reference sources.
//!
//! Each source is fetched, parsed, cached to disk and published
//! independently. A failure is logged and reported for that source only;
//! the store keeps serving whatever it had before. When a source has never
//! loaded in this process, the last cached copy is used instead.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rxplan_config::model::ReferenceConfig;
use rxplan_core::{ReferenceFetcher, RxplanError, SourceId};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::fetch::SourceFetcher;
use crate::ingest::{self, IngestReport};
use crate::store::ReferenceStore;

/// Where to fetch one source from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub id: SourceId,
    pub location: String,
}

/// Result of refreshing one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    /// Fresh data was fetched and published.
    Loaded {
        rows_kept: usize,
        rows_dropped: usize,
        pairs: usize,
    },
    /// The fetch failed; the on-disk cache was published instead.
    LoadedFromCache {
        rows_kept: usize,
        rows_dropped: usize,
        pairs: usize,
        error: String,
    },
    /// Nothing was published; previous tables (if any) remain.
    Failed { error: String },
}

impl SourceOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SourceOutcome::Failed { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            SourceOutcome::Loaded { .. } => "loaded",
            SourceOutcome::LoadedFromCache { .. } => "cache",
            SourceOutcome::Failed { .. } => "failed",
        }
    }
}

/// Per-source outcomes of one refresh pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshReport {
    pub sources: Vec<(SourceId, SourceOutcome)>,
}

impl RefreshReport {
    pub fn outcome(&self, id: SourceId) -> Option<&SourceOutcome> {
        self.sources
            .iter()
            .find(|(source, _)| *source == id)
            .map(|(_, outcome)| outcome)
    }

    pub fn all_failed(&self) -> bool {
        self.sources.iter().all(|(_, outcome)| outcome.is_failure())
    }
}

/// Drives fetch → cache → ingest → publish for every configured source.
pub struct Refresher {
    store: Arc<ReferenceStore>,
    fetcher: Arc<dyn ReferenceFetcher>,
    sources: Vec<SourceSpec>,
    cache_dir: PathBuf,
    // One refresh at a time; concurrent triggers queue behind it.
    running: Mutex<()>,
}

impl Refresher {
    pub fn new(
        store: Arc<ReferenceStore>,
        fetcher: Arc<dyn ReferenceFetcher>,
        sources: Vec<SourceSpec>,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            fetcher,
            sources,
            cache_dir: cache_dir.into(),
            running: Mutex::new(()),
        }
    }

    /// Builds a refresher for the Part D and Medicaid sources in `config`.
    pub fn from_config(
        store: Arc<ReferenceStore>,
        config: &ReferenceConfig,
    ) -> Result<Self, RxplanError> {
        let fetcher = SourceFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;
        let sources = vec![
            SourceSpec {
                id: SourceId::PartD,
                location: config.partd_url.clone(),
            },
            SourceSpec {
                id: SourceId::Medicaid,
                location: config.medicaid_url.clone(),
            },
        ];
        Ok(Self::new(store, Arc::new(fetcher), sources, &config.data_dir))
    }

    pub fn store(&self) -> &Arc<ReferenceStore> {
        &self.store
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Refresh every source. Never fails; see [`RefreshReport`].
    pub async fn refresh_all(&self) -> RefreshReport {
        let _guard = self.running.lock().await;
        let mut report = RefreshReport::default();
        for spec in &self.sources {
            let outcome = self.refresh_source(spec).await;
            rxplan_prometheus::record_refresh(&spec.id.to_string(), outcome.label());
            report.sources.push((spec.id, outcome));
        }
        report
    }

    /// Publish every source from the on-disk cache without touching the network.
    pub async fn load_cached(&self) -> RefreshReport {
        let _guard = self.running.lock().await;
        let mut report = RefreshReport::default();
        for spec in &self.sources {
            let outcome = match self.ingest_cached(spec.id).await {
                Ok((parsed, pairs)) => SourceOutcome::Loaded {
                    rows_kept: parsed.rows_kept,
                    rows_dropped: parsed.rows_dropped,
                    pairs,
                },
                Err(e) => {
                    warn!(source = %spec.id, error = %e, "no usable cached reference data");
                    SourceOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            report.sources.push((spec.id, outcome));
        }
        report
    }

    async fn refresh_source(&self, spec: &SourceSpec) -> SourceOutcome {
        let fetched = self.fetch_and_publish(spec).await;
        let error = match fetched {
            Ok((parsed, pairs)) => {
                info!(
                    source = %spec.id,
                    pairs,
                    rows_kept = parsed.rows_kept,
                    rows_dropped = parsed.rows_dropped,
                    "reference data loaded"
                );
                return SourceOutcome::Loaded {
                    rows_kept: parsed.rows_kept,
                    rows_dropped: parsed.rows_dropped,
                    pairs,
                };
            }
            Err(e) => e,
        };

        warn!(source = %spec.id, error = %error, "reference refresh failed, keeping previous data");

        if self.store.snapshot().source(spec.id).is_loaded() {
            return SourceOutcome::Failed {
                error: error.to_string(),
            };
        }

        match self.ingest_cached(spec.id).await {
            Ok((parsed, pairs)) => {
                info!(source = %spec.id, pairs, "reference data loaded from cache");
                SourceOutcome::LoadedFromCache {
                    rows_kept: parsed.rows_kept,
                    rows_dropped: parsed.rows_dropped,
                    pairs,
                    error: error.to_string(),
                }
            }
            Err(_) => SourceOutcome::Failed {
                error: error.to_string(),
            },
        }
    }

    async fn fetch_and_publish(&self, spec: &SourceSpec) -> Result<(IngestReport, usize), RxplanError> {
        let text = self.fetcher.fetch_text(spec.id, &spec.location).await?;
        let (tables, parsed) = ingest::parse_source(&text).map_err(|e| RxplanError::Ingest {
            source_id: spec.id,
            message: e.to_string(),
        })?;

        if let Err(e) = self.write_cache(spec.id, &text).await {
            warn!(source = %spec.id, error = %e, "failed to cache reference data");
        }

        let pairs = tables.pairs.len();
        self.store.replace(spec.id, tables);
        Ok((parsed, pairs))
    }

    async fn ingest_cached(&self, id: SourceId) -> Result<(IngestReport, usize), RxplanError> {
        let text = tokio::fs::read_to_string(self.cache_path(id)).await?;
        let (tables, parsed) = ingest::parse_source(&text).map_err(|e| RxplanError::Ingest {
            source_id: id,
            message: e.to_string(),
        })?;
        let pairs = tables.pairs.len();
        self.store.replace(id, tables);
        Ok((parsed, pairs))
    }

    async fn write_cache(&self, id: SourceId, text: &str) -> Result<(), RxplanError> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let dir = self.cache_dir.clone();
        let path = self.cache_path(id);
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            // Random hidden name so /data never serves a partial file;
            // removed on drop if the rename does not happen.
            let mut tmp = tempfile::Builder::new()
                .prefix(".")
                .suffix(".tmp")
                .tempfile_in(&dir)?;
            tmp.write_all(text.as_bytes())?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| RxplanError::Internal(format!("cache writer task failed: {e}")))??;
        Ok(())
    }

    /// Path of the cached copy of `id`.
    pub fn cache_path(&self, id: SourceId) -> PathBuf {
        self.cache_dir.join(id.cache_file_name())
    }
}

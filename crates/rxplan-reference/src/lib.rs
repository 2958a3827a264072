// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! BIN/PCN reference data for rxplan.
//!
//! [`ReferenceStore`] holds the published Part D and Medicaid tables behind
//! an atomic snapshot. [`ingest`] turns CSV text into tables, [`fetch`]
//! retrieves it, and [`Refresher`] ties the two together with an on-disk
//! cache.

pub mod fetch;
pub mod ingest;
pub mod refresh;
pub mod store;

pub use fetch::{FileFetcher, HttpFetcher, SourceFetcher};
pub use ingest::{IngestError, IngestReport};
pub use refresh::{RefreshReport, Refresher, SourceOutcome, SourceSpec};
pub use store::{COMMERCIAL_BINS, ReferenceSnapshot, ReferenceStore, SourceTables, pair_key};

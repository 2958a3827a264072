// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV ingestion of BIN/PCN reference lists.
//!
//! Rows are keyed by the `BIN` and `PCN` header columns; any other columns
//! are ignored. A row missing either value, or one the CSV reader cannot
//! decode, is dropped without failing the parse. Only a header without the
//! required columns fails the whole source.

use std::collections::HashSet;

use rxplan_core::normalize;
use thiserror::Error;
use tracing::debug;

use crate::store::{SourceTables, pair_key};

pub const BIN_COLUMN: &str = "BIN";
pub const PCN_COLUMN: &str = "PCN";

/// Errors that reject a whole source.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The header row does not contain a required column.
    #[error("header row has no `{column}` column")]
    MissingColumn { column: &'static str },

    /// The header row itself could not be read.
    #[error("unreadable header row: {0}")]
    Header(#[from] csv::Error),
}

/// Row counts from one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
}

/// Parse `text` into the two target sets.
///
/// Both sets are expected to be freshly constructed; they are only extended.
pub fn parse_into(
    text: &str,
    pairs: &mut HashSet<String>,
    bins: &mut HashSet<String>,
) -> Result<IngestReport, IngestError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(IngestError::MissingColumn { column: name })
    };
    let bin_idx = column(BIN_COLUMN)?;
    let pcn_idx = column(PCN_COLUMN)?;

    let mut report = IngestReport::default();
    for (line, record) in reader.records().enumerate() {
        report.rows_read += 1;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!(line = line + 2, error = %e, "dropping unreadable row");
                report.rows_dropped += 1;
                continue;
            }
        };

        let bin = normalize(record.get(bin_idx).unwrap_or_default());
        let pcn = normalize(record.get(pcn_idx).unwrap_or_default());
        if bin.is_empty() || pcn.is_empty() {
            report.rows_dropped += 1;
            continue;
        }

        pairs.insert(pair_key(&bin, &pcn));
        bins.insert(bin);
        report.rows_kept += 1;
    }

    Ok(report)
}

/// Parse `text` into a fresh, unpublished [`SourceTables`].
pub fn parse_source(text: &str) -> Result<(SourceTables, IngestReport), IngestError> {
    let mut tables = SourceTables::default();
    let report = parse_into(text, &mut tables.pairs, &mut tables.bins)?;
    Ok((tables, report))
}

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for rxplan.

use thiserror::Error;

use crate::types::SourceId;

/// The primary error type used across rxplan crates.
///
/// Classification itself never produces one of these: every input resolves
/// to a [`ClassificationResult`](crate::types::ClassificationResult). Errors
/// only surface from configuration, reference-data refresh, and transport.
#[derive(Debug, Error)]
pub enum RxplanError {
    /// Configuration errors (invalid TOML, bad values, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A reference source could not be downloaded or read.
    #[error("failed to fetch {source_id} reference data: {message}")]
    SourceFetch {
        source_id: SourceId,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A reference source was fetched but could not be parsed.
    #[error("failed to ingest {source_id} reference data: {message}")]
    Ingest { source_id: SourceId, message: String },

    /// Filesystem errors (cache directory, cached CSV files).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP gateway errors (bind failure, server crash).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RxplanError {
    /// Convenience constructor for fetch failures without an underlying cause.
    pub fn fetch(source_id: SourceId, message: impl Into<String>) -> Self {
        RxplanError::SourceFetch {
            source_id,
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_fetch_display_names_the_source() {
        let err = RxplanError::fetch(SourceId::PartD, "HTTP 404");
        assert_eq!(
            err.to_string(),
            "failed to fetch partd reference data: HTTP 404"
        );
    }

    #[test]
    fn io_error_converts() {
        let err: RxplanError = std::io::Error::other("disk full").into();
        assert!(err.to_string().contains("disk full"));
    }
}

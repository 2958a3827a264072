// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fetch-text capability consumed by reference-data refresh.

use async_trait::async_trait;

use crate::error::RxplanError;
use crate::types::SourceId;

/// Retrieves the raw text of a reference source.
///
/// Implementations cover network downloads and local files. A failure is
/// reported per source and never affects classification.
#[async_trait]
pub trait ReferenceFetcher: Send + Sync {
    /// Fetch the full text found at `location` for `source_id`.
    async fn fetch_text(&self, source_id: SourceId, location: &str) -> Result<String, RxplanError>;
}

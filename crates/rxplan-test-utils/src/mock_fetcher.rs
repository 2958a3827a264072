// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted [`ReferenceFetcher`] for deterministic refresh tests.
//!
//! Each location maps to either a body or a failure message. Unknown
//! locations fail. Every call is recorded so tests can assert on traffic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use rxplan_core::{ReferenceFetcher, RxplanError, SourceId};

#[derive(Debug, Clone)]
enum Scripted {
    Body(String),
    Failure(String),
}

/// A fetcher that serves pre-configured responses.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: Arc<Mutex<HashMap<String, Scripted>>>,
    calls: Arc<Mutex<Vec<(SourceId, String)>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `location`.
    pub async fn respond(&self, location: &str, body: &str) {
        self.responses
            .lock()
            .await
            .insert(location.to_string(), Scripted::Body(body.to_string()));
    }

    /// Fail every fetch of `location` with `message`.
    pub async fn fail(&self, location: &str, message: &str) {
        self.responses
            .lock()
            .await
            .insert(location.to_string(), Scripted::Failure(message.to_string()));
    }

    /// Locations fetched so far, in order.
    pub async fn calls(&self) -> Vec<(SourceId, String)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ReferenceFetcher for MockFetcher {
    async fn fetch_text(&self, source_id: SourceId, location: &str) -> Result<String, RxplanError> {
        self.calls
            .lock()
            .await
            .push((source_id, location.to_string()));
        match self.responses.lock().await.get(location) {
            Some(Scripted::Body(body)) => Ok(body.clone()),
            Some(Scripted::Failure(message)) => Err(RxplanError::fetch(source_id, message.clone())),
            None => Err(RxplanError::fetch(
                source_id,
                format!("no scripted response for {location}"),
            )),
        }
    }
}

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`ReferenceFetcher`] implementations for network and local sources.

use std::time::Duration;

use async_trait::async_trait;
use rxplan_core::{ReferenceFetcher, RxplanError, SourceId};
use tracing::debug;

/// Downloads reference CSVs over http(s).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, RxplanError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rxplan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RxplanError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ReferenceFetcher for HttpFetcher {
    async fn fetch_text(&self, source_id: SourceId, location: &str) -> Result<String, RxplanError> {
        let wrap = |message: String, e: reqwest::Error| RxplanError::SourceFetch {
            source_id,
            message,
            source: Some(Box::new(e)),
        };

        debug!(%source_id, url = location, "downloading reference data");
        let response = self
            .client
            .get(location)
            .send()
            .await
            .map_err(|e| wrap(format!("request to {location} failed: {e}"), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RxplanError::fetch(
                source_id,
                format!("download failed for {location}: HTTP {status}"),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| wrap(format!("failed to read body from {location}: {e}"), e))
    }
}

/// Reads reference CSVs from the local filesystem.
///
/// Accepts bare paths and `file://` URLs.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher;

#[async_trait]
impl ReferenceFetcher for FileFetcher {
    async fn fetch_text(&self, source_id: SourceId, location: &str) -> Result<String, RxplanError> {
        let path = location.strip_prefix("file://").unwrap_or(location);
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RxplanError::SourceFetch {
                source_id,
                message: format!("cannot read {path}: {e}"),
                source: Some(Box::new(e)),
            })
    }
}

/// Picks [`HttpFetcher`] or [`FileFetcher`] by the location's scheme.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl SourceFetcher {
    pub fn new(timeout: Duration) -> Result<Self, RxplanError> {
        Ok(Self {
            http: HttpFetcher::new(timeout)?,
            file: FileFetcher,
        })
    }
}

fn is_http(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[async_trait]
impl ReferenceFetcher for SourceFetcher {
    async fn fetch_text(&self, source_id: SourceId, location: &str) -> Result<String, RxplanError> {
        if is_http(location) {
            self.http.fetch_text(source_id, location).await
        } else {
            self.file.fetch_text(source_id, location).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> SourceFetcher {
        SourceFetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn http_success_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/partd.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("BIN,PCN\n004336,MEDDADV\n"))
            .mount(&server)
            .await;

        let url = format!("{}/partd.csv", server.uri());
        let text = fetcher().fetch_text(SourceId::PartD, &url).await.unwrap();
        assert!(text.contains("004336"));
    }

    #[tokio::test]
    async fn http_error_status_is_a_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing.csv", server.uri());
        let err = fetcher()
            .fetch_text(SourceId::Medicaid, &url)
            .await
            .unwrap_err();
        match err {
            RxplanError::SourceFetch {
                source_id, message, ..
            } => {
                assert_eq!(source_id, SourceId::Medicaid);
                assert!(message.contains("404"), "got: {message}");
            }
            other => panic!("expected SourceFetch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn file_url_and_bare_path_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("medicaid.csv");
        std::fs::write(&file, "BIN,PCN\n610494,MCDNY\n").unwrap();

        let bare = file.display().to_string();
        let url = format!("file://{bare}");
        let f = fetcher();
        assert!(f.fetch_text(SourceId::Medicaid, &bare).await.unwrap().contains("MCDNY"));
        assert!(f.fetch_text(SourceId::Medicaid, &url).await.unwrap().contains("MCDNY"));
    }

    #[tokio::test]
    async fn missing_file_is_a_fetch_error() {
        let err = FileFetcher
            .fetch_text(SourceId::PartD, "/nonexistent/partd.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, RxplanError::SourceFetch { source_id: SourceId::PartD, .. }));
    }

    #[test]
    fn scheme_detection() {
        assert!(is_http("https://download.cms.gov/x.csv"));
        assert!(is_http("HTTP://example.org"));
        assert!(!is_http("file:///tmp/x.csv"));
        assert!(!is_http("data/partd.csv"));
    }
}

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: config → HTTP download → cache → engine → gateway.
//!
//! Reference CSVs are served by a local mock server; each test gets its own
//! cache directory.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use rxplan_classifier::ClassificationEngine;
use rxplan_config::RxplanConfig;
use rxplan_core::SourceId;
use rxplan_gateway::{GatewayState, build_router};
use rxplan_reference::{Refresher, ReferenceStore, SourceOutcome};
use rxplan_test_utils::fixtures::{MEDICAID_CSV, PARTD_CSV};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn upstream(partd_status: u16, medicaid_status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/partd.csv"))
        .respond_with(ResponseTemplate::new(partd_status).set_body_string(PARTD_CSV))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/medicaid.csv"))
        .respond_with(ResponseTemplate::new(medicaid_status).set_body_string(MEDICAID_CSV))
        .mount(&server)
        .await;
    server
}

fn config(server: &MockServer, data_dir: &std::path::Path) -> RxplanConfig {
    let toml = format!(
        r#"
[reference]
partd_url = "{uri}/partd.csv"
medicaid_url = "{uri}/medicaid.csv"
data_dir = "{dir}"
fetch_timeout_secs = 5
"#,
        uri = server.uri(),
        dir = data_dir.display(),
    );
    rxplan_config::load_and_validate_str(&toml).unwrap()
}

struct Stack {
    engine: Arc<ClassificationEngine>,
    refresher: Arc<Refresher>,
}

fn stack(config: &RxplanConfig) -> Stack {
    let store = Arc::new(ReferenceStore::new());
    let engine = Arc::new(ClassificationEngine::from_config(
        Arc::clone(&store),
        &config.classifier,
    ));
    let refresher = Arc::new(Refresher::from_config(store, &config.reference).unwrap());
    Stack { engine, refresher }
}

async fn classify(stack: &Stack, data_dir: &std::path::Path, body: &str) -> serde_json::Value {
    let state = GatewayState {
        engine: Arc::clone(&stack.engine),
        refresher: Arc::clone(&stack.refresher),
        prometheus_render: None,
    };
    let app = build_router(state, data_dir);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/classify")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn download_cache_and_classify() {
    let server = upstream(200, 200).await;
    let dir = tempfile::tempdir().unwrap();
    let stack = stack(&config(&server, dir.path()));

    let report = stack.refresher.refresh_all().await;
    assert!(!report.all_failed());
    assert!(dir.path().join("partd.csv").exists());
    assert!(dir.path().join("medicaid.csv").exists());

    let r = classify(&stack, dir.path(), r#"{"bin":"004336","pcn":"MEDDADV"}"#).await;
    assert_eq!(r["plan"], "Medicare Part D / MA-PD");
    assert_eq!(r["confidence"], 0.99);

    let r = classify(&stack, dir.path(), r#"{"bin":"610494","pcn":"MCDNY"}"#).await;
    assert_eq!(r["plan"], "State Medicaid");

    // 610502 is a commercial BIN but also appears in the Part D fixture.
    let r = classify(&stack, dir.path(), r#"{"bin":"610502"}"#).await;
    assert_eq!(r["plan"], "Likely Medicare Part D");
}

#[tokio::test]
async fn upstream_failure_on_one_source() {
    let server = upstream(503, 200).await;
    let dir = tempfile::tempdir().unwrap();
    let stack = stack(&config(&server, dir.path()));

    let report = stack.refresher.refresh_all().await;
    match report.outcome(SourceId::PartD) {
        Some(SourceOutcome::Failed { error }) => assert!(error.contains("503"), "{error}"),
        other => panic!("expected failure, got {other:?}"),
    }

    let r = classify(&stack, dir.path(), r#"{"bin":"004336","pcn":"MEDDADV"}"#).await;
    // Only the Medicaid list knows 004336 (paired with MCDOH).
    assert_eq!(r["plan"], "Likely Medicaid");
    assert_eq!(r["confidence"], 0.9);
}

#[tokio::test]
async fn restart_with_upstream_down_uses_cache() {
    let dir = tempfile::tempdir().unwrap();
    {
        let server = upstream(200, 200).await;
        let first = stack(&config(&server, dir.path()));
        first.refresher.refresh_all().await;
    }

    let down = upstream(500, 500).await;
    let second = stack(&config(&down, dir.path()));
    let report = second.refresher.refresh_all().await;
    assert!(matches!(
        report.outcome(SourceId::PartD),
        Some(SourceOutcome::LoadedFromCache { .. })
    ));
    assert!(second.engine.health());

    let r = classify(&second, dir.path(), r#"{"bin":"004336","pcn":"MEDDADV"}"#).await;
    assert_eq!(r["plan"], "Medicare Part D / MA-PD");
}

#[tokio::test]
async fn offline_load_reads_cache_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("medicaid.csv"), MEDICAID_CSV).unwrap();

    let server = upstream(200, 200).await;
    let stack = stack(&config(&server, dir.path()));
    let report = stack.refresher.load_cached().await;

    assert!(report.outcome(SourceId::PartD).unwrap().is_failure());
    assert!(server.received_requests().await.unwrap().is_empty());

    let r = classify(&stack, dir.path(), r#"{"bin":"610494","pcn":"MCDNY"}"#).await;
    assert_eq!(r["plan"], "State Medicaid");
}

// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.

use std::collections::BTreeMap;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rxplan_core::{ClassificationResult, SourceId};
use serde::Serialize;
use tracing::{debug, info};

use crate::server::GatewayState;

/// Per-source summary in the health response.
#[derive(Debug, Serialize)]
pub struct SourceHealth {
    pub pairs: usize,
    pub bins: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// True once any reference source has loaded.
    pub initialized: bool,
    pub version: &'static str,
    pub sources: BTreeMap<String, SourceHealth>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let snapshot = state.engine.store().snapshot();
    let sources = [SourceId::PartD, SourceId::Medicaid]
        .into_iter()
        .map(|id| {
            let tables = snapshot.source(id);
            (
                id.to_string(),
                SourceHealth {
                    pairs: tables.pairs.len(),
                    bins: tables.bins.len(),
                    loaded_at: tables.loaded_at,
                },
            )
        })
        .collect();

    Json(HealthResponse {
        ok: true,
        initialized: snapshot.is_initialized(),
        version: env!("CARGO_PKG_VERSION"),
        sources,
    })
}

/// POST /api/classify
///
/// The body is parsed leniently: anything that is not a JSON object with
/// string fields classifies as empty input.
pub async fn post_classify(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Json<ClassificationResult> {
    let value = serde_json::from_slice::<serde_json::Value>(&body).unwrap_or_else(|e| {
        debug!(error = %e, "unparseable classify body, treating as empty");
        serde_json::Value::Null
    });
    Json(state.engine.classify_json(&value))
}

/// Any non-POST method on /api/classify.
pub async fn classify_method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(ErrorResponse {
            error: "POST only".to_string(),
        }),
    )
        .into_response()
}

/// POST /api/refresh
///
/// Starts a refresh in the background and returns immediately.
pub async fn post_refresh(State(state): State<GatewayState>) -> Response {
    let refresher = state.refresher.clone();
    tokio::spawn(async move {
        let report = refresher.refresh_all().await;
        let failed = report.sources.iter().filter(|(_, o)| o.is_failure()).count();
        info!(failed, total = report.sources.len(), "background refresh finished");
    });

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "status": "refresh started" })),
    )
        .into_response()
}

/// GET /metrics
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.prometheus_render {
        Some(render) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "metrics disabled".to_string(),
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "POST only".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"error":"POST only"}"#
        );
    }

    #[test]
    fn health_response_serializes_sources() {
        let mut sources = BTreeMap::new();
        sources.insert(
            "partd".to_string(),
            SourceHealth {
                pairs: 3,
                bins: 2,
                loaded_at: None,
            },
        );
        let resp = HealthResponse {
            ok: true,
            initialized: false,
            version: "0.1.0",
            sources,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["initialized"], false);
        assert_eq!(json["sources"]["partd"]["pairs"], 3);
        assert!(json["sources"]["partd"]["loaded_at"].is_null());
    }
}

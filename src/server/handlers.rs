//! JSON API handlers.
//!
//! The heartbeat answers with a friendly connection confirmation, the
//! welfare check relays the generated report, and errors come back as
//! `{ "error": ... }` strings.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use super::SharedState;
use crate::heartbeat::{HeartbeatEntry, now_ms};
use crate::welfare::derive_status;

#[derive(Debug, Default, Deserialize)]
pub struct HeartbeatRequest {
    /// Label for where the signal came from ("MacroDroid", "Browser Test
    /// Button", ...).
    pub source: Option<String>,
    /// Free-form extras, e.g. `{"battery": 82}`.
    pub metadata: Option<serde_json::Value>,
    /// When true, generate a check-in confirmation and deliver it to the
    /// contacts, returning the generated content.
    #[serde(default)]
    pub notify: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    /// Who fired the check ("cron", "dashboard", "cli"). Log label only.
    pub trigger: Option<String>,
}

fn server_time() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// POST /api/heartbeat
///
/// Any body is accepted; a missing or malformed one counts as a bare
/// heartbeat from "direct".
pub async fn heartbeat(State(state): SharedState, body: Bytes) -> Response {
    let request: HeartbeatRequest = serde_json::from_slice(&body).unwrap_or_default();
    let source = request.source.unwrap_or_else(|| "direct".to_string());

    let entry = HeartbeatEntry::new(&source, request.metadata);
    info!(source = %entry.source, "heartbeat received");
    state.heartbeats.push(entry.clone());

    let mut response = json!({
        "status": "ok",
        "message": "Connection to GuardianSwitch cloud is active!",
        "server_time": server_time(),
        "received_from": entry.source,
    });

    if request.notify {
        match state.checker.acknowledge(&entry, &state.alerts).await {
            Ok(outcome) => {
                response["content"] = json!(outcome.report);
                response["deliveries"] = json!(outcome.deliveries);
            }
            Err(e) => {
                error!("check-in acknowledgment failed: {e:#}");
                response["content_error"] = json!(e.to_string());
            }
        }
    }

    Json(response).into_response()
}

/// POST /api/check-welfare
pub async fn check_welfare(
    State(state): SharedState,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = &state.config.server.cron_secret {
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| token == secret);
        if !authorized {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "missing or invalid authorization" })),
            )
                .into_response();
        }
    }

    let Some(_permit) = state.gate.try_begin() else {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "a welfare check is already running" })),
        )
            .into_response();
    };

    let request: CheckRequest = serde_json::from_slice(&body).unwrap_or_default();
    let trigger = request.trigger.unwrap_or_else(|| "manual".to_string());
    info!(%trigger, "welfare check started");

    let last = state.heartbeats.latest();
    match state.checker.run(last.as_ref(), &state.alerts).await {
        Ok(outcome) => Json(json!({
            "success": true,
            "message": "Check executed",
            "report": outcome.report,
            "deliveries": outcome.deliveries,
        }))
        .into_response(),
        Err(e) => {
            error!("welfare check failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Check failed" })),
            )
                .into_response()
        }
    }
}

/// GET /api/status
pub async fn status(State(state): SharedState) -> Response {
    let heartbeats = state.heartbeats.snapshot();
    let alerts = state.alerts.snapshot();
    let now = now_ms();

    let status = derive_status(
        state.config.alarm_enabled,
        heartbeats.first(),
        alerts.first(),
        state.config.stale_window(),
        now,
    );

    Json(json!({
        "status": status,
        "server_time": server_time(),
        "check_in_time": state.config.check_in_time,
        "last_heartbeat": heartbeats.first(),
        "heartbeats": heartbeats,
        "alerts": alerts,
        "uptime_ms": now.saturating_sub(state.started_ms),
    }))
    .into_response()
}

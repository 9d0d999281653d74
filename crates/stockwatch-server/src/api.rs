//! Handlers for the trigger endpoints.
//!
//! Two entry points: a full inventory check (hit by store webhooks or a
//! schedule) and a reminder-only check (schedule only). Both authenticate
//! before the orchestrator runs, and both answer with a JSON summary of
//! what the cycle did.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::json;
use stockwatch_core::Orchestrator;
use tracing::{error, info, warn};

use crate::auth::TriggerAuth;

/// Shared application state passed to all handlers via axum's `State`
/// extractor
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub auth: Arc<TriggerAuth>,
}

/// POST /hooks/inventory — Run a full inventory check.
///
/// 200 with a cycle summary on success; 502 when the catalog fetch failed
/// (the only failure a cycle is allowed to report); 401 when the request
/// isn't authenticated.
pub async fn inventory_check(
    State(app): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    if let Err(e) = app.auth.authorize(&headers, &body) {
        warn!(error = %e, "rejected inventory check trigger");
        return unauthorized();
    }

    info!("starting inventory check");
    match app.orchestrator.run_inventory_check().await {
        Ok(summary) => (StatusCode::OK, Json(json!(summary))),
        Err(e) => {
            error!(error = %e, "inventory check failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": e.to_string()})),
            )
        }
    }
}

/// POST /hooks/reminders — Run the reminder check only.
///
/// Never fetches the catalog, so short of a panic it always answers 200.
pub async fn reminder_check(
    State(app): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    if let Err(e) = app.auth.authorize(&headers, &body) {
        warn!(error = %e, "rejected reminder check trigger");
        return unauthorized();
    }

    info!("starting reminder check");
    match app.orchestrator.run_reminder_check().await {
        Ok(summary) => (StatusCode::OK, Json(json!(summary))),
        Err(e) => {
            error!(error = %e, "reminder check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
        }
    }
}

/// GET /healthz — Liveness probe, no auth
pub async fn healthz() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

fn unauthorized() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "unauthorized"})),
    )
}

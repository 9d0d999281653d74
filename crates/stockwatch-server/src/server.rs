//! Axum server setup and router construction.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use stockwatch_core::Orchestrator;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::auth::TriggerAuth;

/// Build the full axum router.
///
/// The router serves:
/// - Inventory check trigger at `POST /hooks/inventory`
/// - Reminder-only trigger at `POST /hooks/reminders`
/// - Liveness probe at `GET /healthz`
pub fn build_router(orchestrator: Arc<Orchestrator>, auth: TriggerAuth) -> Router {
    let app_state = AppState {
        orchestrator,
        auth: Arc::new(auth),
    };

    Router::new()
        .route("/hooks/inventory", post(api::inventory_check))
        .route("/hooks/reminders", post(api::reminder_check))
        .route("/healthz", get(api::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the axum server and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "server exited");
        }
    });

    Ok(addr)
}

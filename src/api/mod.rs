//! REST surface for the collaborator layer.
//!
//! Read endpoints return the latest published snapshot slices; the two
//! command endpoints queue mutations for the scheduler:
//! - `GET /reading`, `/history`, `/devices`, `/building/floors`,
//!   `/industry/machines`, `/industry/scope`, `/city/wards`, `/market`,
//!   `/daily-stats`
//! - `POST /devices/{id}/toggle`, `POST /market/trade`

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::runtime::SimHandle;

pub use types::{CommandAck, ErrorResponse, TradeRequest};

/// Application state shared across all request handlers.
///
/// Holds the scheduler handle only; every read goes through the latest
/// immutable snapshot, so no locks are needed.
pub struct AppState {
    /// Handle to the running scheduler.
    pub handle: SimHandle,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/reading", get(handlers::get_reading))
        .route("/history", get(handlers::get_history))
        .route("/devices", get(handlers::get_devices))
        .route("/devices/{id}/toggle", post(handlers::post_toggle))
        .route("/building/floors", get(handlers::get_floors))
        .route("/industry/machines", get(handlers::get_machines))
        .route("/industry/scope", get(handlers::get_scope))
        .route("/city/wards", get(handlers::get_wards))
        .route("/market", get(handlers::get_market))
        .route("/market/trade", post(handlers::post_trade))
        .route("/daily-stats", get(handlers::get_daily_stats))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}

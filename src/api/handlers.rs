//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::ambient::AmbientReading;
use crate::devices::Device;
use crate::sim::building::BuildingFloor;
use crate::sim::city::CityWard;
use crate::sim::daily::DailyStat;
use crate::sim::industry::{IndustryMachine, ScopeSample};
use crate::sim::market::MarketSnapshot;
use crate::sim::types::Reading;

use super::AppState;
use super::types::{CommandAck, ErrorResponse, TradeRequest};

/// `GET /reading` → 200 + the latest meter reading.
pub async fn get_reading(State(state): State<Arc<AppState>>) -> Json<Reading> {
    Json(state.handle.latest().reading.clone())
}

/// `GET /history` → 200 + up to 60 readings, oldest first.
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<Reading>> {
    Json(state.handle.latest().history.clone())
}

/// `GET /devices` → 200 + the device roster with ambient context.
pub async fn get_devices(State(state): State<Arc<AppState>>) -> Json<DevicesResponse> {
    let snap = state.handle.latest();
    Json(DevicesResponse {
        devices: snap.devices.clone(),
        ambient: snap.ambient.clone(),
        is_peak_hour: snap.is_peak_hour,
    })
}

/// Roster payload with the ambient context readers pair it with.
#[derive(Debug, serde::Serialize)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
    pub ambient: AmbientReading,
    pub is_peak_hour: bool,
}

/// `POST /devices/{id}/toggle` → 202 + ack.
///
/// Unknown ids are accepted and ignored by the engine, matching the
/// command's no-op contract.
pub async fn post_toggle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !state.handle.toggle_device(&id) {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "scheduler is not running".to_string(),
            }),
        ));
    }
    Ok((StatusCode::ACCEPTED, Json(CommandAck::queued())))
}

/// `GET /building/floors` → 200 + floor states.
pub async fn get_floors(State(state): State<Arc<AppState>>) -> Json<Vec<BuildingFloor>> {
    Json(state.handle.latest().floors.clone())
}

/// `GET /industry/machines` → 200 + machine states.
pub async fn get_machines(State(state): State<Arc<AppState>>) -> Json<Vec<IndustryMachine>> {
    Json(state.handle.latest().machines.clone())
}

/// `GET /industry/scope` → 200 + the bounded oscilloscope trace.
pub async fn get_scope(State(state): State<Arc<AppState>>) -> Json<Vec<ScopeSample>> {
    Json(state.handle.latest().scope.clone())
}

/// `GET /city/wards` → 200 + ward states.
pub async fn get_wards(State(state): State<Arc<AppState>>) -> Json<Vec<CityWard>> {
    Json(state.handle.latest().wards.clone())
}

/// `GET /market` → 200 + price, bounded price history, and the ledger.
pub async fn get_market(State(state): State<Arc<AppState>>) -> Json<MarketSnapshot> {
    Json(state.handle.latest().market.clone())
}

/// `GET /daily-stats` → 200 + the static 24-hour baseline.
pub async fn get_daily_stats(State(state): State<Arc<AppState>>) -> Json<Vec<DailyStat>> {
    Json(state.handle.latest().daily_stats.clone())
}

/// `POST /market/trade` → 202 + ack, or 400 for a malformed amount.
///
/// An affordable-funds check is not done here: an underfunded buy is queued
/// and silently rejected by the ledger, observable through `GET /market`.
pub async fn post_trade(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TradeRequest>,
) -> impl IntoResponse {
    if !req.amount.is_finite() || req.amount <= 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`amount` must be a positive number, got {}", req.amount),
            }),
        ));
    }
    if !state.handle.trade(req.amount, req.side) {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "scheduler is not running".to_string(),
            }),
        ));
    }
    Ok((StatusCode::ACCEPTED, Json(CommandAck::queued())))
}

//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use super::dto::{
    CheckinRequest, CheckinResponse, FreeRoomsQuery, HealthResponse, HeatmapQuery, LoadCsvRequest,
    LoadCsvResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{HeatmapCell, RoomDetailData, RoomSnapshot, SummaryData};
use crate::db::services as db_services;
use crate::seed::populate_from_csv;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };
    let dataset = state.repository.dataset_info().await.unwrap_or(None);

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
        dataset,
    }))
}

// =============================================================================
// Rooms
// =============================================================================

/// GET /rooms/all
///
/// List all rooms with their derived status and current occupancy level.
pub async fn rooms_all(State(state): State<AppState>) -> HandlerResult<Vec<RoomSnapshot>> {
    let rooms = db_services::list_rooms(
        state.repository.as_ref(),
        state.config.analytics.occupancy_threshold,
        Utc::now(),
    )
    .await?;
    Ok(Json(rooms))
}

/// GET /rooms/free
///
/// List rooms that are currently free, optionally filtered by block and
/// minimum capacity.
pub async fn rooms_free(
    State(state): State<AppState>,
    Query(query): Query<FreeRoomsQuery>,
) -> HandlerResult<Vec<RoomSnapshot>> {
    let rooms = db_services::free_rooms(
        state.repository.as_ref(),
        state.config.analytics.occupancy_threshold,
        query.block.as_deref(),
        query.capacity,
        Utc::now(),
    )
    .await?;
    Ok(Json(rooms))
}

/// GET /rooms/{room_id}
///
/// Full detail for one room: snapshot, timetable and recent occupancy
/// history.
pub async fn room_detail(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> HandlerResult<RoomDetailData> {
    let detail = db_services::room_detail(
        state.repository.as_ref(),
        &room_id,
        state.config.analytics.occupancy_threshold,
        Utc::now(),
    )
    .await?;
    Ok(Json(detail))
}

/// POST /rooms/{room_id}/checkin
///
/// Record a new occupancy level for a room.
pub async fn checkin(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<CheckinRequest>,
) -> HandlerResult<CheckinResponse> {
    let record =
        db_services::checkin(state.repository.as_ref(), &room_id, request.occupancy_level).await?;
    Ok(Json(CheckinResponse {
        ok: true,
        occupancy_id: record.id,
    }))
}

// =============================================================================
// Analytics
// =============================================================================

/// GET /analytics/heatmap
///
/// Mean occupancy per block over a configurable trailing window.
pub async fn heatmap(
    State(state): State<AppState>,
    Query(query): Query<HeatmapQuery>,
) -> HandlerResult<Vec<HeatmapCell>> {
    let window = query
        .window_minutes
        .unwrap_or(state.config.analytics.heatmap_window_minutes);
    if window <= 0 {
        return Err(AppError::BadRequest(format!(
            "window_minutes must be positive, got {}",
            window
        )));
    }
    let cells = db_services::heatmap(state.repository.as_ref(), window, Utc::now()).await?;
    Ok(Json(cells))
}

/// GET /analytics/summary
///
/// Aggregate statistics: room/capacity counts, per-block averages,
/// coverage and the recent insert rate.
pub async fn summary(State(state): State<AppState>) -> HandlerResult<SummaryData> {
    let data = db_services::summary(state.repository.as_ref(), Utc::now()).await?;
    Ok(Json(data))
}

// =============================================================================
// Admin
// =============================================================================

/// POST /admin/load_csv
///
/// Reload the dataset from CSV files on the server's filesystem.
pub async fn admin_load_csv(
    State(state): State<AppState>,
    Json(request): Json<LoadCsvRequest>,
) -> HandlerResult<LoadCsvResponse> {
    let dataset = populate_from_csv(
        state.repository.as_ref(),
        &request.rooms_path,
        &request.timetable_path,
    )
    .await?;
    Ok(Json(LoadCsvResponse {
        loaded: true,
        dataset,
    }))
}
